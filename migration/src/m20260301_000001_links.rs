use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::Code).string_len(64).not_null())
                    .col(ColumnDef::new(Links::OriginalUrl).text().not_null())
                    .col(ColumnDef::new(Links::OwnerId).string_len(64).null())
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::IsCustom)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // code 唯一索引：并发插入时由数据库保证唯一性
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_code")
                    .table(Links::Table)
                    .col(Links::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // owner 列表按创建时间倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner_created")
                    .table(Links::Table)
                    .col(Links::OwnerId)
                    .col(Links::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_owner_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    Table,
    Id,
    Code,
    OriginalUrl,
    OwnerId,
    CreatedAt,
    IsCustom,
}
