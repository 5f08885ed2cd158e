//! The module contains the `User` account and its table.

use sea_orm::entity::prelude::*;

/// Role assigned to self-registered accounts.
pub const DEFAULT_ROLE_ID: i32 = 2;

/// A user account as exposed outside the engine.
///
/// The password hash never leaves the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub role_id: i32,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub whatsapp: Option<String>,
    pub is_active: bool,
    /// Entitlement flag for the profit/loss ledger.
    pub ledger_access: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub role_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub organization: String,
    pub whatsapp: Option<String>,
    pub password: String,
    pub is_active: bool,
    pub ledger_access: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ledger::Entity")]
    Ledger,
}

impl Related<super::ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            role_id: value.role_id,
            name: value.name,
            email: value.email,
            organization: value.organization,
            whatsapp: value.whatsapp,
            is_active: value.is_active,
            ledger_access: value.ledger_access,
        }
    }
}
