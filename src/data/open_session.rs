//! Open session data repository for database operations.
//!
//! The `open_session` table mirrors the presence tracker's in-memory open
//! sessions so they can be restored after a crash. Rows are keyed by
//! `(user_id, channel_id)`, which enforces at most one open session per pair.

use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::model::session::{OpenSession, SessionKey};

/// Repository providing database operations for the open session snapshot.
pub struct OpenSessionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OpenSessionRepository<'a, C> {
    /// Creates a new OpenSessionRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    ///
    /// # Returns
    /// - `OpenSessionRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates or replaces the snapshot row for a session.
    ///
    /// # Arguments
    /// - `session` - Open session to store
    ///
    /// # Returns
    /// - `Ok(())` - Row written
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn upsert(&self, session: &OpenSession) -> Result<(), DbErr> {
        use entity::open_session::Column;

        entity::prelude::OpenSession::insert(entity::open_session::ActiveModel {
            user_id: ActiveValue::Set(session.user_id.to_string()),
            channel_id: ActiveValue::Set(session.channel_id.to_string()),
            guild_id: ActiveValue::Set(session.guild_id.to_string()),
            joined_at: ActiveValue::Set(session.joined_at),
            last_activity_at: ActiveValue::Set(session.last_activity_at),
            confirmed: ActiveValue::Set(session.confirmed),
        })
        .on_conflict(
            OnConflict::columns([Column::UserId, Column::ChannelId])
                .update_columns([
                    Column::GuildId,
                    Column::JoinedAt,
                    Column::LastActivityAt,
                    Column::Confirmed,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// Deletes the snapshot row of a session.
    ///
    /// The join time must match, so closing an old session never removes the
    /// row of a newer session the same user opened in the same channel.
    ///
    /// # Arguments
    /// - `key` - User, channel and join time of the session
    ///
    /// # Returns
    /// - `Ok(true)` - A row was deleted
    /// - `Ok(false)` - No row existed
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, key: &SessionKey) -> Result<bool, DbErr> {
        let result = entity::prelude::OpenSession::delete_many()
            .filter(entity::open_session::Column::UserId.eq(key.user_id.to_string()))
            .filter(entity::open_session::Column::ChannelId.eq(key.channel_id.to_string()))
            .filter(entity::open_session::Column::JoinedAt.eq(key.joined_at))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets every stored open session.
    ///
    /// # Returns
    /// - `Ok(Vec<OpenSession>)` - All snapshot rows ordered by `joined_at` ascending
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_all(&self) -> Result<Vec<OpenSession>, DbErr> {
        let entities = entity::prelude::OpenSession::find()
            .order_by_asc(entity::open_session::Column::JoinedAt)
            .all(self.db)
            .await?;

        entities.into_iter().map(OpenSession::from_entity).collect()
    }
}
