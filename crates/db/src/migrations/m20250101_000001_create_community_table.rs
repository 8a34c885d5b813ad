//! Create community table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Community::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Community::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Community::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Community::CommunityCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Community::Location).string_len(256).not_null())
                    .col(ColumnDef::new(Community::City).string_len(128).not_null())
                    .col(ColumnDef::new(Community::State).string_len(128).not_null())
                    .col(ColumnDef::new(Community::Pincode).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Community::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Community::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_community_code")
                    .table(Community::Table)
                    .col(Community::CommunityCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_community_name")
                    .table(Community::Table)
                    .col(Community::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Community::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Community {
    Table,
    Id,
    Name,
    CommunityCode,
    Location,
    City,
    State,
    Pincode,
    IsActive,
    CreatedAt,
}
