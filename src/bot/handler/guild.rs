//! Guild availability handler.
//!
//! `guild_create` fires on startup for each guild the bot is in, when the bot
//! joins a guild and when a guild becomes available again after an outage. Its
//! payload includes the voice state of every connected member, which the
//! tracker uses to reconcile open sessions.

use chrono::Utc;
use serenity::all::{Context, Guild};

use crate::{
    model::notification::VoiceSnapshot,
    service::presence::{TrackerEvent, TrackerHandle},
};

/// Handles the guild_create event by sending the guild's voice snapshot to the tracker.
///
/// # Arguments
/// - `tracker` - Presence tracker
/// - `_ctx` - Discord context (unused)
/// - `guild` - Guild with its current voice states
/// - `_is_new` - Whether the bot just joined the guild (unused)
pub async fn handle_guild_create(
    tracker: &TrackerHandle,
    _ctx: Context,
    guild: Guild,
    _is_new: Option<bool>,
) {
    let snapshot = VoiceSnapshot::from_voice_states(guild.id.get(), &guild.voice_states, Utc::now());

    tracing::debug!(
        "Guild create event: {} ({}) - {} members in voice",
        guild.name,
        guild.id,
        snapshot.members.len()
    );

    if let Err(e) = tracker.send(TrackerEvent::Snapshot(snapshot)).await {
        tracing::error!("Failed to send voice snapshot for guild {}: {}", guild.id, e);
    }
}
