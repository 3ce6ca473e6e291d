//! Create view record table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ViewRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViewRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ViewRecord::VoterKey).string_len(128).not_null())
                    .col(ColumnDef::new(ViewRecord::DiscussionId).string_len(32).not_null())
                    .col(ColumnDef::new(ViewRecord::ViewDate).date().not_null())
                    .col(
                        ColumnDef::new(ViewRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_record_discussion")
                            .from(ViewRecord::Table, ViewRecord::DiscussionId)
                            .to(Discussion::Table, Discussion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (voter_key, discussion_id, view_date) - one counted view per day
        manager
            .create_index(
                Index::create()
                    .name("idx_view_record_voter_discussion_date")
                    .table(ViewRecord::Table)
                    .col(ViewRecord::VoterKey)
                    .col(ViewRecord::DiscussionId)
                    .col(ViewRecord::ViewDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ViewRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ViewRecord {
    Table,
    Id,
    VoterKey,
    DiscussionId,
    ViewDate,
    CreatedAt,
}

#[derive(Iden)]
enum Discussion {
    Table,
    Id,
}
