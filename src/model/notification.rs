//! Voice-state notifications delivered by the gateway.
//!
//! A [`RawVoiceStateNotification`] is accepted exactly as the gateway hands it
//! over (every field optional). The tracker only ever works with a validated
//! [`VoiceStateNotification`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serenity::all::{UserId, VoiceState};

use crate::{error::notification::NotificationError, util::time::normalize};

/// Voice-state change as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVoiceStateNotification {
    pub guild_id: Option<u64>,
    pub user_id: Option<u64>,
    pub old_channel_id: Option<u64>,
    pub new_channel_id: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawVoiceStateNotification {
    /// Builds a notification from a serenity voice state update.
    ///
    /// The gateway does not timestamp voice state updates, so the time the
    /// update was received is used.
    ///
    /// # Arguments
    /// - `old` - Previous voice state from the cache, if it was known
    /// - `new` - Updated voice state
    /// - `received_at` - When the update arrived
    pub fn from_voice_states(
        old: Option<&VoiceState>,
        new: &VoiceState,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id: new
                .guild_id
                .or_else(|| old.and_then(|o| o.guild_id))
                .map(|id| id.get()),
            user_id: Some(new.user_id.get()),
            old_channel_id: old.and_then(|o| o.channel_id).map(|id| id.get()),
            new_channel_id: new.channel_id.map(|id| id.get()),
            timestamp: Some(received_at),
        }
    }
}

/// Validated voice-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceStateNotification {
    pub guild_id: u64,
    pub user_id: u64,
    pub old_channel_id: Option<u64>,
    pub new_channel_id: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<RawVoiceStateNotification> for VoiceStateNotification {
    type Error = NotificationError;

    fn try_from(raw: RawVoiceStateNotification) -> Result<Self, Self::Error> {
        Ok(Self {
            guild_id: raw
                .guild_id
                .ok_or(NotificationError::Malformed { field: "guild_id" })?,
            user_id: raw
                .user_id
                .ok_or(NotificationError::Malformed { field: "user_id" })?,
            old_channel_id: raw.old_channel_id,
            new_channel_id: raw.new_channel_id,
            timestamp: normalize(
                raw.timestamp
                    .ok_or(NotificationError::Malformed { field: "timestamp" })?,
            ),
        })
    }
}

/// Who is in which voice channel of a guild at one instant.
///
/// Delivered when a guild becomes available, which after a reconnect is the
/// only record of what changed while the bot was offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSnapshot {
    pub guild_id: u64,
    /// `(user_id, channel_id)` pairs for every member connected to voice.
    pub members: Vec<(u64, u64)>,
    pub taken_at: DateTime<Utc>,
}

impl VoiceSnapshot {
    /// Builds a snapshot from a guild's cached voice states.
    ///
    /// Members without a channel are skipped.
    pub fn from_voice_states(
        guild_id: u64,
        voice_states: &HashMap<UserId, VoiceState>,
        taken_at: DateTime<Utc>,
    ) -> Self {
        let mut members: Vec<(u64, u64)> = voice_states
            .values()
            .filter_map(|state| {
                state
                    .channel_id
                    .map(|channel_id| (state.user_id.get(), channel_id.get()))
            })
            .collect();
        members.sort_unstable();

        Self {
            guild_id,
            members,
            taken_at: normalize(taken_at),
        }
    }

    pub fn contains(&self, user_id: u64, channel_id: u64) -> bool {
        self.members.contains(&(user_id, channel_id))
    }
}
