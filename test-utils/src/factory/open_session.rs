//! Open session factory for creating snapshot rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{at, next_id};

/// Factory for creating open session snapshot rows with customizable fields.
pub struct OpenSessionFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: u64,
    user_id: u64,
    channel_id: u64,
    joined_at: DateTime<Utc>,
    last_activity_at: Option<DateTime<Utc>>,
    confirmed: bool,
}

impl<'a> OpenSessionFactory<'a> {
    /// Creates a new OpenSessionFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: `1`
    /// - user_id and channel_id: unique auto-incremented values
    /// - joined_at: epoch
    /// - last_activity_at: same as joined_at
    /// - confirmed: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: 1,
            user_id: next_id(),
            channel_id: next_id(),
            joined_at: at(0),
            last_activity_at: None,
            confirmed: true,
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

    pub fn last_activity_at(mut self, last_activity_at: DateTime<Utc>) -> Self {
        self.last_activity_at = Some(last_activity_at);
        self
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    /// Builds and inserts the snapshot row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::open_session::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::open_session::Model, DbErr> {
        entity::open_session::ActiveModel {
            user_id: ActiveValue::Set(self.user_id.to_string()),
            channel_id: ActiveValue::Set(self.channel_id.to_string()),
            guild_id: ActiveValue::Set(self.guild_id.to_string()),
            joined_at: ActiveValue::Set(self.joined_at),
            last_activity_at: ActiveValue::Set(self.last_activity_at.unwrap_or(self.joined_at)),
            confirmed: ActiveValue::Set(self.confirmed),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a confirmed open session in guild `1` that started at `joined` seconds.
pub async fn create_open_session(
    db: &DatabaseConnection,
    user_id: u64,
    channel_id: u64,
    joined: i64,
) -> Result<entity::open_session::Model, DbErr> {
    OpenSessionFactory::new(db)
        .user_id(user_id)
        .channel_id(channel_id)
        .joined_at(at(joined))
        .build()
        .await
}
