//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(User::Email).string_len(256).not_null())
                    .col(ColumnDef::new(User::PhoneNumber).string_len(64).not_null())
                    .col(ColumnDef::new(User::PasswordHash).string_len(256).not_null())
                    .col(
                        ColumnDef::new(User::Role)
                            .string_len(32)
                            .not_null()
                            .default("RESIDENT"),
                    )
                    .col(ColumnDef::new(User::Address).string_len(512).not_null())
                    .col(ColumnDef::new(User::Locality).string_len(256).not_null())
                    .col(ColumnDef::new(User::Pincode).string_len(16).not_null())
                    .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(User::IsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::ProfilePicture).string_len(1024))
                    .col(ColumnDef::new(User::CommunityId).string_len(32))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: phone_number
        manager
            .create_index(
                Index::create()
                    .name("idx_user_phone_number")
                    .table(User::Table)
                    .col(User::PhoneNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_community_id")
                    .table(User::Table)
                    .col(User::CommunityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_user_community_id")
                    .from(User::Table, User::CommunityId)
                    .to(Community::Table, Community::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    FullName,
    Email,
    PhoneNumber,
    PasswordHash,
    Role,
    Address,
    Locality,
    Pincode,
    IsActive,
    IsVerified,
    ProfilePicture,
    CommunityId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Community {
    Table,
    Id,
}
