//! Attendance session data repository for database operations.
//!
//! Closed sessions are append-only: this repository can insert and read them,
//! never update or delete them.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::model::session::{AttendanceSession, SessionFilter, SessionKey};

/// Repository providing database operations for closed attendance sessions.
pub struct AttendanceSessionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AttendanceSessionRepository<'a, C> {
    /// Creates a new AttendanceSessionRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    ///
    /// # Returns
    /// - `AttendanceSessionRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the closed session with the given key.
    ///
    /// # Arguments
    /// - `key` - User, channel and join time of the session
    ///
    /// # Returns
    /// - `Ok(Some(AttendanceSession))` - A session with this key is recorded
    /// - `Ok(None)` - No session with this key exists
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_key(&self, key: &SessionKey) -> Result<Option<AttendanceSession>, DbErr> {
        let entity = entity::prelude::AttendanceSession::find()
            .filter(entity::attendance_session::Column::UserId.eq(key.user_id.to_string()))
            .filter(entity::attendance_session::Column::ChannelId.eq(key.channel_id.to_string()))
            .filter(entity::attendance_session::Column::JoinedAt.eq(key.joined_at))
            .one(self.db)
            .await?;

        entity.map(AttendanceSession::from_entity).transpose()
    }

    /// Inserts a closed session.
    ///
    /// Does not check for an existing session with the same key; the unique index
    /// rejects it in migrated databases. Callers that need a typed duplicate
    /// error check with `find_by_key` first inside the same transaction.
    ///
    /// # Arguments
    /// - `session` - Closed session to store
    ///
    /// # Returns
    /// - `Ok(AttendanceSession)` - The stored session
    /// - `Err(DbErr)` - Database error during insert
    pub async fn insert(&self, session: &AttendanceSession) -> Result<AttendanceSession, DbErr> {
        let entity = entity::attendance_session::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(session.guild_id.to_string()),
            user_id: ActiveValue::Set(session.user_id.to_string()),
            channel_id: ActiveValue::Set(session.channel_id.to_string()),
            joined_at: ActiveValue::Set(session.joined_at),
            left_at: ActiveValue::Set(session.left_at),
            close_reason: ActiveValue::Set(session.close_reason.as_str().to_string()),
        }
        .insert(self.db)
        .await?;

        AttendanceSession::from_entity(entity)
    }

    /// Queries closed sessions matching a filter.
    ///
    /// The time range uses overlap semantics: a session matches when it started
    /// no later than the range end and ended no earlier than the range start.
    ///
    /// # Arguments
    /// - `filter` - Optional guild, user, channel and time range constraints
    ///
    /// # Returns
    /// - `Ok(Vec<AttendanceSession>)` - Matching sessions ordered by `joined_at` ascending
    /// - `Err(DbErr)` - Database error during query
    pub async fn query(&self, filter: &SessionFilter) -> Result<Vec<AttendanceSession>, DbErr> {
        use entity::attendance_session::Column;

        let mut query = entity::prelude::AttendanceSession::find();

        if let Some(guild_id) = filter.guild_id {
            query = query.filter(Column::GuildId.eq(guild_id.to_string()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(Column::UserId.eq(user_id.to_string()));
        }
        if let Some(channel_id) = filter.channel_id {
            query = query.filter(Column::ChannelId.eq(channel_id.to_string()));
        }
        if let Some(start) = filter.range.start {
            query = query.filter(Column::LeftAt.gte(start));
        }
        if let Some(end) = filter.range.end {
            query = query.filter(Column::JoinedAt.lte(end));
        }

        let entities = query
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(AttendanceSession::from_entity)
            .collect()
    }
}
