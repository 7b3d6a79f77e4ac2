use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OpenSession::Table)
                    .if_not_exists()
                    .col(string(OpenSession::UserId))
                    .col(string(OpenSession::ChannelId))
                    .col(string(OpenSession::GuildId))
                    .col(timestamp(OpenSession::JoinedAt))
                    .col(timestamp(OpenSession::LastActivityAt))
                    .col(boolean(OpenSession::Confirmed))
                    .primary_key(
                        Index::create()
                            .col(OpenSession::UserId)
                            .col(OpenSession::ChannelId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OpenSession::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OpenSession {
    Table,
    UserId,
    ChannelId,
    GuildId,
    JoinedAt,
    LastActivityAt,
    Confirmed,
}
