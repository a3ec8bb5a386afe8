//! Initial schema migration - creates all tables from scratch.
//!
//! The schema for tankbook:
//!
//! - `users`: authentication and ownership
//! - `operations`: fuel purchase/sale records with the valuated fields

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
    CreatedAt,
}

#[derive(Iden)]
enum Operations {
    Table,
    Id,
    UserId,
    Kind,
    Fuel,
    Quantity,
    UnitPrice,
    TaxRatePercent,
    TotalValue,
    OccurredAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Operations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operations::UserId).string().not_null())
                    .col(ColumnDef::new(Operations::Kind).string().not_null())
                    .col(ColumnDef::new(Operations::Fuel).string().not_null())
                    // Decimal values are stored as text; sqlite has no exact
                    // numeric type.
                    .col(ColumnDef::new(Operations::Quantity).string().not_null())
                    .col(ColumnDef::new(Operations::UnitPrice).string().not_null())
                    .col(
                        ColumnDef::new(Operations::TaxRatePercent)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Operations::TotalValue).string().not_null())
                    .col(
                        ColumnDef::new(Operations::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-operations-user_id")
                            .from(Operations::Table, Operations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operations-user_id-occurred_at")
                    .table(Operations::Table)
                    .col(Operations::UserId)
                    .col(Operations::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
