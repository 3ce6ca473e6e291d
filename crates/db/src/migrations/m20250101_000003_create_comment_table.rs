//! Create comment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comment::DiscussionId).string_len(32).not_null())
                    .col(ColumnDef::new(Comment::UserId).string_len(32))
                    .col(ColumnDef::new(Comment::SessionId).string_len(64))
                    .col(ColumnDef::new(Comment::Content).text().not_null())
                    .col(ColumnDef::new(Comment::Stance).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Comment::UpvoteCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::DownvoteCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_discussion")
                            .from(Comment::Table, Comment::DiscussionId)
                            .to(Discussion::Table, Discussion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_user")
                            .from(Comment::Table, Comment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: discussion_id (for listing comments on a discussion)
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_discussion_id")
                    .table(Comment::Table)
                    .col(Comment::DiscussionId)
                    .to_owned(),
            )
            .await?;

        // Index: (discussion_id, upvote_count) - best comments
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_discussion_upvotes")
                    .table(Comment::Table)
                    .col(Comment::DiscussionId)
                    .col(Comment::UpvoteCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
    DiscussionId,
    UserId,
    SessionId,
    Content,
    Stance,
    UpvoteCount,
    DownvoteCount,
    CreatedAt,
}

#[derive(Iden)]
enum Discussion {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
