use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, SqlErr, prelude::*};

use crate::{
    EngineError, LedgerRecord, LedgerStats, MoneyCents, ResultEngine, ledger,
    ledger::normalize_date, stats,
};

use super::{Engine, users::require_user};

/// Client supplied fields of a ledger record.
///
/// `net` is not part of the input: it is always derived from revenue and
/// expense.
#[derive(Clone, Debug)]
pub struct LedgerInput {
    pub date: String,
    pub revenue: MoneyCents,
    pub expense: MoneyCents,
}

impl Engine {
    /// All records of `owner_id`, newest first.
    pub async fn ledger_records(&self, owner_id: i32) -> ResultEngine<Vec<LedgerRecord>> {
        let records = ledger::Entity::find()
            .filter(ledger::Column::UserId.eq(owner_id))
            .order_by_desc(ledger::Column::Date)
            .order_by_desc(ledger::Column::Id)
            .all(&self.database)
            .await?;

        tracing::debug!(owner_id, count = records.len(), "listed ledger records");
        Ok(records.into_iter().map(LedgerRecord::from).collect())
    }

    /// A single record by id.
    pub async fn ledger_record(&self, id: i32) -> ResultEngine<LedgerRecord> {
        ledger::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(LedgerRecord::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("ledger record {id}")))
    }

    /// Create a record for `owner_id`.
    ///
    /// An owner has at most one record per date; a second one fails with
    /// [`EngineError::ExistingKey`]. The insert is a single statement and the
    /// `(user_id, date)` unique index decides between concurrent creates.
    pub async fn create_ledger_record(
        &self,
        owner_id: i32,
        input: LedgerInput,
    ) -> ResultEngine<LedgerRecord> {
        if owner_id <= 0 {
            return Err(EngineError::InvalidInput(
                "owner_id is required".to_string(),
            ));
        }
        let date = normalize_date(&input.date)?;
        let record = LedgerRecord::new(0, owner_id, date, input.revenue, input.expense);
        require_user(&self.database, owner_id).await?;

        let now = Utc::now();
        let active = ledger::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(owner_id),
            date: ActiveValue::Set(record.date.clone()),
            revenue_minor: ActiveValue::Set(record.revenue.cents()),
            expense_minor: ActiveValue::Set(record.expense.cents()),
            net_minor: ActiveValue::Set(record.net.cents()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active
            .insert(&self.database)
            .await
            .map_err(|err| write_error(err, owner_id, &record.date))?;

        tracing::info!(
            id = model.id,
            owner_id,
            date = %model.date,
            net = %record.net,
            "ledger record created"
        );
        Ok(model.into())
    }

    /// Replace date, revenue and expense of record `id` and recompute its net.
    ///
    /// The new date must not collide with another record of the same owner.
    /// The row is written first, so SQLite takes the write lock up front.
    pub async fn update_ledger_record(
        &self,
        id: i32,
        input: LedgerInput,
    ) -> ResultEngine<LedgerRecord> {
        let date = normalize_date(&input.date)?;
        let net = input.revenue - input.expense;

        let active = ledger::ActiveModel {
            id: ActiveValue::Unchanged(id),
            user_id: ActiveValue::NotSet,
            date: ActiveValue::Set(date.clone()),
            revenue_minor: ActiveValue::Set(input.revenue.cents()),
            expense_minor: ActiveValue::Set(input.expense.cents()),
            net_minor: ActiveValue::Set(net.cents()),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::Set(Utc::now()),
        };
        let model = active
            .update(&self.database)
            .await
            .map_err(|err| match err {
                DbErr::RecordNotUpdated => EngineError::KeyNotFound(format!("ledger record {id}")),
                err => EngineError::from_unique_violation(err, &date),
            })?;

        tracing::info!(id, date = %model.date, net = %net, "ledger record updated");
        Ok(model.into())
    }

    /// Delete record `id`. Deleting a missing record succeeds.
    pub async fn delete_ledger_record(&self, id: i32) -> ResultEngine<()> {
        let result = ledger::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;

        tracing::info!(id, rows = result.rows_affected, "ledger record deleted");
        Ok(())
    }

    /// Aggregate the records of `owner_id` relative to `today`.
    ///
    /// See [`stats::aggregate`] for the bucket rules.
    pub async fn ledger_stats(&self, owner_id: i32, today: NaiveDate) -> ResultEngine<LedgerStats> {
        let records = ledger::Entity::find()
            .filter(ledger::Column::UserId.eq(owner_id))
            .order_by_asc(ledger::Column::Date)
            .order_by_asc(ledger::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerRecord::from)
            .collect();

        stats::aggregate(records, today)
    }
}

/// Map a failed insert: a taken date is a conflict, a missing owner is not found.
fn write_error(err: DbErr, owner_id: i32, date: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            EngineError::KeyNotFound(format!("user {owner_id}"))
        }
        _ => EngineError::from_unique_violation(err, date),
    }
}
