//! Create vote record table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoteRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoteRecord::VoterKey).string_len(128).not_null())
                    .col(ColumnDef::new(VoteRecord::UserId).string_len(32))
                    .col(ColumnDef::new(VoteRecord::TargetKind).string_len(16).not_null())
                    .col(ColumnDef::new(VoteRecord::TargetId).string_len(32).not_null())
                    .col(ColumnDef::new(VoteRecord::VoteType).string_len(16).not_null())
                    .col(ColumnDef::new(VoteRecord::Weight).big_integer().not_null())
                    .col(
                        ColumnDef::new(VoteRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_record_user")
                            .from(VoteRecord::Table, VoteRecord::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (voter_key, target_id) - one vote per voter per target,
        // whatever the vote type
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_record_voter_target")
                    .table(VoteRecord::Table)
                    .col(VoteRecord::VoterKey)
                    .col(VoteRecord::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: target_id (for counting votes on a target)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_record_target_id")
                    .table(VoteRecord::Table)
                    .col(VoteRecord::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoteRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VoteRecord {
    Table,
    Id,
    VoterKey,
    UserId,
    TargetKind,
    TargetId,
    VoteType,
    Weight,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
