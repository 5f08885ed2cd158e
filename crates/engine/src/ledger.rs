//! The module contains `LedgerRecord` and the `profit_losses` table.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Storage and wire format of ledger dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One dated revenue/expense entry owned by a user.
///
/// `net` is always `revenue - expense`; it is computed by [`LedgerRecord::new`]
/// and never accepted from callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerRecord {
    pub id: i32,
    pub owner_id: i32,
    /// ISO `YYYY-MM-DD` date as stored.
    pub date: String,
    pub revenue: MoneyCents,
    pub expense: MoneyCents,
    pub net: MoneyCents,
}

impl LedgerRecord {
    pub fn new(
        id: i32,
        owner_id: i32,
        date: impl Into<String>,
        revenue: MoneyCents,
        expense: MoneyCents,
    ) -> Self {
        Self {
            id,
            owner_id,
            date: date.into(),
            revenue,
            expense,
            net: revenue - expense,
        }
    }

    /// Parse the stored date.
    pub fn parsed_date(&self) -> ResultEngine<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            EngineError::InvalidData(format!(
                "record {} has an invalid date: {}",
                self.id, self.date
            ))
        })
    }
}

/// Validate a client supplied date and return its canonical form.
pub(crate) fn normalize_date(value: &str) -> ResultEngine<String> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        EngineError::InvalidInput(format!("invalid date '{value}', expected YYYY-MM-DD"))
    })?;
    Ok(date.format(DATE_FORMAT).to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profit_losses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub date: String,
    pub revenue_minor: i64,
    pub expense_minor: i64,
    pub net_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LedgerRecord {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            owner_id: value.user_id,
            date: value.date,
            revenue: MoneyCents::new(value.revenue_minor),
            expense: MoneyCents::new(value.expense_minor),
            net: MoneyCents::new(value.net_minor),
        }
    }
}
