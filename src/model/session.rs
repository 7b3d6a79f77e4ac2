//! Attendance session models.
//!
//! An [`OpenSession`] is a participant's presence in a tracked voice channel
//! that has not ended yet; closing it consumes it and produces an immutable
//! [`AttendanceSession`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::DbErr;
use serde::Serialize;

use crate::{model::range::TimeRange, util::parse::parse_snowflake};

/// Why a session was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The participant left voice.
    Left,
    /// The participant moved to another channel.
    Moved,
    /// The participant was missing from the voice snapshot received after a reconnect.
    Reconciled,
    /// The session stayed unconfirmed for longer than the grace period.
    Expired,
    /// Tracking stopped.
    Shutdown,
}

impl CloseReason {
    /// Returns the string representation for SQL storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Moved => "moved",
            Self::Reconciled => "reconciled",
            Self::Expired => "expired",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloseReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "moved" => Ok(Self::Moved),
            "reconciled" => Ok(Self::Reconciled),
            "expired" => Ok(Self::Expired),
            "shutdown" => Ok(Self::Shutdown),
            _ => Err(format!("invalid close reason: {s}")),
        }
    }
}

/// Identifies the single open session a user may have in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresenceKey {
    pub user_id: u64,
    pub channel_id: u64,
}

/// Identifies a session across its whole lifetime, and a closed session uniquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: u64,
    pub channel_id: u64,
    pub joined_at: DateTime<Utc>,
}

/// A participant's ongoing presence in a tracked voice channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenSession {
    pub guild_id: u64,
    pub user_id: u64,
    pub channel_id: u64,
    pub joined_at: DateTime<Utc>,
    /// Last instant the participant was known to be present.
    pub last_activity_at: DateTime<Utc>,
    /// `false` until presence is confirmed after a connection loss or restart.
    pub confirmed: bool,
}

impl OpenSession {
    /// Opens a confirmed session starting at `joined_at`.
    pub fn new(guild_id: u64, user_id: u64, channel_id: u64, joined_at: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            user_id,
            channel_id,
            joined_at,
            last_activity_at: joined_at,
            confirmed: true,
        }
    }

    pub fn presence_key(&self) -> PresenceKey {
        PresenceKey {
            user_id: self.user_id,
            channel_id: self.channel_id,
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey {
            user_id: self.user_id,
            channel_id: self.channel_id,
            joined_at: self.joined_at,
        }
    }

    /// Closes the session.
    ///
    /// `left_at` is clamped to `joined_at` so a closed session never has a
    /// negative duration.
    pub fn close(self, left_at: DateTime<Utc>, reason: CloseReason) -> AttendanceSession {
        AttendanceSession {
            guild_id: self.guild_id,
            user_id: self.user_id,
            channel_id: self.channel_id,
            joined_at: self.joined_at,
            left_at: left_at.max(self.joined_at),
            close_reason: reason,
        }
    }

    /// Converts an entity model to an open session domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(OpenSession)` - The converted domain model
    /// - `Err(DbErr::Type)` - A stored ID is not a valid snowflake
    pub fn from_entity(entity: entity::open_session::Model) -> Result<Self, DbErr> {
        Ok(Self {
            guild_id: parse_snowflake("guild_id", &entity.guild_id)?,
            user_id: parse_snowflake("user_id", &entity.user_id)?,
            channel_id: parse_snowflake("channel_id", &entity.channel_id)?,
            joined_at: entity.joined_at,
            last_activity_at: entity.last_activity_at,
            confirmed: entity.confirmed,
        })
    }
}

/// One continuous, finished interval of a user's presence in a tracked channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSession {
    pub guild_id: u64,
    pub user_id: u64,
    pub channel_id: u64,
    pub joined_at: DateTime<Utc>,
    pub left_at: DateTime<Utc>,
    pub close_reason: CloseReason,
}

impl AttendanceSession {
    pub fn duration(&self) -> TimeDelta {
        self.left_at - self.joined_at
    }

    pub fn key(&self) -> SessionKey {
        SessionKey {
            user_id: self.user_id,
            channel_id: self.channel_id,
            joined_at: self.joined_at,
        }
    }

    /// Portion of the session that falls inside `range`.
    pub fn duration_within(&self, range: &TimeRange) -> TimeDelta {
        range.clip(self.joined_at, self.left_at)
    }

    /// Converts an entity model to an attendance session domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(AttendanceSession)` - The converted domain model
    /// - `Err(DbErr::Type)` - A stored ID or close reason is invalid
    pub fn from_entity(entity: entity::attendance_session::Model) -> Result<Self, DbErr> {
        Ok(Self {
            guild_id: parse_snowflake("guild_id", &entity.guild_id)?,
            user_id: parse_snowflake("user_id", &entity.user_id)?,
            channel_id: parse_snowflake("channel_id", &entity.channel_id)?,
            joined_at: entity.joined_at,
            left_at: entity.left_at,
            close_reason: entity.close_reason.parse().map_err(DbErr::Type)?,
        })
    }
}

/// A change to session state produced by the presence tracker.
///
/// Transitions produced by one tracker event are persisted together in a
/// single store transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    /// A new session started.
    Opened(OpenSession),
    /// An open session's activity or confirmation changed.
    Refreshed(OpenSession),
    /// A session ended and becomes part of the permanent history.
    Closed(AttendanceSession),
}

/// Filter for querying closed sessions. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub guild_id: Option<u64>,
    pub user_id: Option<u64>,
    pub channel_id: Option<u64>,
    pub range: TimeRange,
}

impl SessionFilter {
    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn for_channel(channel_id: u64) -> Self {
        Self {
            channel_id: Some(channel_id),
            ..Default::default()
        }
    }

    pub fn in_guild(mut self, guild_id: Option<u64>) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn within(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }
}
