//! Ready event handler.
//!
//! `ready` fires after every successful identify, both on startup and after a
//! reconnect that could not resume. Missed voice events are not replayed in
//! that case; the `guild_create` snapshots that follow reconcile them.

use chrono::Utc;
use serenity::all::{ActivityData, Context, Ready};

use crate::service::presence::{TrackerEvent, TrackerHandle};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `tracker` - Presence tracker to notify of the healthy connection
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(tracker: &TrackerHandle, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::watching("voice channels")));

    if let Err(e) = tracker
        .send(TrackerEvent::ConnectionRestored {
            replayed: false,
            at: Utc::now(),
        })
        .await
    {
        tracing::error!("Failed to notify tracker of connection: {}", e);
    }
}
