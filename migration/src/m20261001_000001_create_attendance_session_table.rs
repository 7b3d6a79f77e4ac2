use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttendanceSession::Table)
                    .if_not_exists()
                    .col(pk_auto(AttendanceSession::Id))
                    .col(string(AttendanceSession::GuildId))
                    .col(string(AttendanceSession::UserId))
                    .col(string(AttendanceSession::ChannelId))
                    .col(timestamp(AttendanceSession::JoinedAt))
                    .col(timestamp(AttendanceSession::LeftAt))
                    .col(string(AttendanceSession::CloseReason))
                    .to_owned(),
            )
            .await?;

        // A closed session is identified by who, where and when it started
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_session_key")
                    .table(AttendanceSession::Table)
                    .col(AttendanceSession::UserId)
                    .col(AttendanceSession::ChannelId)
                    .col(AttendanceSession::JoinedAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_session_channel_joined_at")
                    .table(AttendanceSession::Table)
                    .col(AttendanceSession::ChannelId)
                    .col(AttendanceSession::JoinedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_session_channel_joined_at")
                    .table(AttendanceSession::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_session_key")
                    .table(AttendanceSession::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AttendanceSession::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AttendanceSession {
    Table,
    Id,
    GuildId,
    UserId,
    ChannelId,
    JoinedAt,
    LeftAt,
    CloseReason,
}
