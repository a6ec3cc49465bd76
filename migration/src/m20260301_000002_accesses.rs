//! Access log table
//!
//! One row per successful resolution. Rows are never updated; stats queries
//! go through the `code` index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accesses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accesses::Code).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Accesses::AccessedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accesses::ClientAgent).text().null())
                    .col(ColumnDef::new(Accesses::ClientAddress).string_len(45).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accesses_code")
                    .table(Accesses::Table)
                    .col(Accesses::Code)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_accesses_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accesses {
    Table,
    Id,
    Code,
    AccessedAt,
    ClientAgent,
    ClientAddress,
}
