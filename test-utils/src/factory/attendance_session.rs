//! Attendance session factory for creating closed session rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{at, next_id};

/// Factory for creating closed attendance sessions with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::attendance_session::AttendanceSessionFactory;
///
/// let session = AttendanceSessionFactory::new(&db)
///     .user_id(42)
///     .channel_id(7)
///     .joined_at(at(0))
///     .left_at(at(600))
///     .build()
///     .await?;
/// ```
pub struct AttendanceSessionFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: u64,
    user_id: u64,
    channel_id: u64,
    joined_at: DateTime<Utc>,
    left_at: DateTime<Utc>,
    close_reason: String,
}

impl<'a> AttendanceSessionFactory<'a> {
    /// Creates a new AttendanceSessionFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: `1`
    /// - user_id and channel_id: unique auto-incremented values
    /// - joined_at: epoch, left_at: epoch + 60s
    /// - close_reason: `"left"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: 1,
            user_id: next_id(),
            channel_id: next_id(),
            joined_at: at(0),
            left_at: at(60),
            close_reason: "left".to_string(),
        }
    }

    pub fn guild_id(mut self, guild_id: u64) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn channel_id(mut self, channel_id: u64) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn joined_at(mut self, joined_at: DateTime<Utc>) -> Self {
        self.joined_at = joined_at;
        self
    }

    pub fn left_at(mut self, left_at: DateTime<Utc>) -> Self {
        self.left_at = left_at;
        self
    }

    pub fn close_reason(mut self, close_reason: impl Into<String>) -> Self {
        self.close_reason = close_reason.into();
        self
    }

    /// Builds and inserts the session row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::attendance_session::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::attendance_session::Model, DbErr> {
        entity::attendance_session::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id.to_string()),
            user_id: ActiveValue::Set(self.user_id.to_string()),
            channel_id: ActiveValue::Set(self.channel_id.to_string()),
            joined_at: ActiveValue::Set(self.joined_at),
            left_at: ActiveValue::Set(self.left_at),
            close_reason: ActiveValue::Set(self.close_reason),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a closed session in guild `1` between two second offsets.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - Participant
/// - `channel_id` - Voice channel
/// - `joined` - Join time in seconds after the epoch
/// - `left` - Leave time in seconds after the epoch
pub async fn create_attendance_session(
    db: &DatabaseConnection,
    user_id: u64,
    channel_id: u64,
    joined: i64,
    left: i64,
) -> Result<entity::attendance_session::Model, DbErr> {
    AttendanceSessionFactory::new(db)
        .user_id(user_id)
        .channel_id(channel_id)
        .joined_at(at(joined))
        .left_at(at(left))
        .build()
        .await
}
