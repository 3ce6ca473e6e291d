//! Create discussion table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Discussion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Discussion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Discussion::Subject).string_len(200).not_null())
                    .col(ColumnDef::new(Discussion::Content).text().not_null())
                    .col(ColumnDef::new(Discussion::UserId).string_len(32))
                    .col(ColumnDef::new(Discussion::SessionId).string_len(64))
                    .col(
                        ColumnDef::new(Discussion::AgreeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Discussion::DisagreeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Discussion::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Discussion::CommentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Discussion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_discussion_user")
                            .from(Discussion::Table, Discussion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's discussions)
        manager
            .create_index(
                Index::create()
                    .name("idx_discussion_user_id")
                    .table(Discussion::Table)
                    .col(Discussion::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for listing and trending windows)
        manager
            .create_index(
                Index::create()
                    .name("idx_discussion_created_at")
                    .table(Discussion::Table)
                    .col(Discussion::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Discussion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Discussion {
    Table,
    Id,
    Subject,
    Content,
    UserId,
    SessionId,
    AgreeCount,
    DisagreeCount,
    ViewCount,
    CommentCount,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
