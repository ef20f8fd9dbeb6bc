//! Migration: Create transactions table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Transactions::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Every query filters by owner and date
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_id_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_user_id_date")
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Date,
    Name,
    Category,
    Amount,
}
