//! Initial schema.
//!
//! - `users`: accounts, argon2 password hashes, activation and entitlement flags
//! - `profit_losses`: one dated revenue/expense row per owner and day

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    RoleId,
    Name,
    Email,
    Organization,
    Whatsapp,
    Password,
    IsActive,
    LedgerAccess,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProfitLosses {
    Table,
    Id,
    UserId,
    Date,
    RevenueMinor,
    ExpenseMinor,
    NetMinor,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::RoleId)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Organization).string().not_null())
                    .col(ColumnDef::new(Users::Whatsapp).string())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::LedgerAccess)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfitLosses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfitLosses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfitLosses::UserId).integer().not_null())
                    // ISO `YYYY-MM-DD`, parsed by the engine when aggregating.
                    .col(ColumnDef::new(ProfitLosses::Date).string().not_null())
                    .col(
                        ColumnDef::new(ProfitLosses::RevenueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitLosses::ExpenseMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProfitLosses::NetMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(ProfitLosses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitLosses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profit_losses_user")
                            .from(ProfitLosses::Table, ProfitLosses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per owner and day.
        manager
            .create_index(
                Index::create()
                    .name("idx_profit_losses_user_date")
                    .table(ProfitLosses::Table)
                    .col(ProfitLosses::UserId)
                    .col(ProfitLosses::Date)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfitLosses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
