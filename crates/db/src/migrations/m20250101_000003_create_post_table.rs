//! Create post table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Post::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Post::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Post::Description).text().not_null())
                    .col(ColumnDef::new(Post::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Post::Type).string_len(16).not_null())
                    .col(ColumnDef::new(Post::ContactInfo).string_len(256))
                    .col(ColumnDef::new(Post::Price).double())
                    .col(ColumnDef::new(Post::Location).string_len(256))
                    .col(
                        ColumnDef::new(Post::Images)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Post::IsUrgent).boolean().not_null().default(false))
                    .col(ColumnDef::new(Post::IsFeatured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Post::ViewCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Post::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Post::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::CommunityId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Post::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Board listing: (community_id, created_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_community_id_created_at")
                    .table(Post::Table)
                    .col(Post::CommunityId)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_user_id")
                    .table(Post::Table)
                    .col(Post::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_post_user_id")
                    .from(Post::Table, Post::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_post_community_id")
                    .from(Post::Table, Post::CommunityId)
                    .to(Community::Table, Community::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    Title,
    Description,
    Category,
    Type,
    ContactInfo,
    Price,
    Location,
    Images,
    IsUrgent,
    IsFeatured,
    ViewCount,
    IsActive,
    UserId,
    CommunityId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Community {
    Table,
    Id,
}
