//! Results returned by the reporting interface.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::model::{range::TimeRange, session::AttendanceSession};

/// Outcome of a report query.
///
/// A query that matches nothing yields `NoData` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report<T> {
    NoData,
    Data(T),
}

impl<T> Report<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn data(self) -> Option<T> {
        match self {
            Self::NoData => None,
            Self::Data(data) => Some(data),
        }
    }
}

/// A user's closed sessions within a time range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttendance {
    pub user_id: u64,
    pub range: TimeRange,
    /// Sum of each session's overlap with `range`.
    pub total: TimeDelta,
    /// Ordered by `joined_at` ascending.
    pub sessions: Vec<AttendanceSession>,
}

/// Distinct users with at least one closed session in a channel during a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub channel_id: u64,
    pub range: TimeRange,
    pub user_ids: BTreeSet<u64>,
}

/// Session count and time spent in one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBreakdown {
    pub channel_id: u64,
    pub sessions: usize,
    pub total_time: TimeDelta,
}

/// Aggregated statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_id: u64,
    /// Closed plus currently open sessions.
    pub total_sessions: usize,
    pub completed_sessions: usize,
    pub active_sessions: usize,
    pub total_time: TimeDelta,
    pub average_session: TimeDelta,
    pub longest_session: TimeDelta,
    /// Ordered by session count, most visited first.
    pub channels: Vec<ChannelBreakdown>,
}

/// One row of the guild leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivity {
    pub user_id: u64,
    pub sessions: usize,
    pub total_time: TimeDelta,
    pub active: bool,
}

/// Guild-wide attendance overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSummary {
    pub users_tracked: usize,
    pub total_sessions: usize,
    pub currently_active: usize,
    /// At most ten users ordered by session count.
    pub top_users: Vec<UserActivity>,
}

/// Usage of one channel across all users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPopularity {
    pub channel_id: u64,
    pub sessions: usize,
    pub unique_users: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One row per session.
    #[default]
    Csv,
    /// JSON keyed by user with statistics and sessions.
    Detailed,
}

impl ExportFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "detailed" | "json" => Ok(Self::Detailed),
            _ => Err(format!("invalid export format: {s}")),
        }
    }
}

/// Exported attendance data ready to attach to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content: Vec<u8>,
}
