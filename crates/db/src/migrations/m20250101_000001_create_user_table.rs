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
                    .col(ColumnDef::new(User::Nick).string_len(200).not_null())
                    .col(ColumnDef::new(User::Email).string_len(200).not_null())
                    .col(ColumnDef::new(User::Provider).string_len(32).not_null())
                    .col(ColumnDef::new(User::ProviderId).string_len(256).not_null())
                    .col(ColumnDef::new(User::Token).string_len(64))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: nick
        manager
            .create_index(
                Index::create()
                    .name("idx_user_nick")
                    .table(User::Table)
                    .col(User::Nick)
                    .unique()
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

        // Unique index: (provider, provider_id) - one account per external login
        manager
            .create_index(
                Index::create()
                    .name("idx_user_provider")
                    .table(User::Table)
                    .col(User::Provider)
                    .col(User::ProviderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: token
        manager
            .create_index(
                Index::create()
                    .name("idx_user_token")
                    .table(User::Table)
                    .col(User::Token)
                    .unique()
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
    Nick,
    Email,
    Provider,
    ProviderId,
    Token,
    CreatedAt,
}
