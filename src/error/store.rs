use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of the session store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A closed session with the same `(user_id, channel_id, joined_at)` key is
    /// already stored.
    ///
    /// Expected when a notification is redelivered; callers treat it as a
    /// successful no-op.
    #[error("Session for user {user_id} in channel {channel_id} joined at {joined_at} is already recorded")]
    DuplicateSession {
        user_id: u64,
        channel_id: u64,
        joined_at: DateTime<Utc>,
    },

    /// The operation did not complete within the configured bound.
    #[error("Session store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl StoreError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
