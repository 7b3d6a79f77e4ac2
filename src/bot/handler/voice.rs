use chrono::Utc;
use serenity::all::{Context, VoiceState};

use crate::{
    model::notification::RawVoiceStateNotification,
    service::presence::{TrackerEvent, TrackerHandle},
};

/// Forwards a voice state change to the presence tracker.
///
/// `old` is only known when the previous state was cached; the tracker infers
/// the previous channel from its own open sessions otherwise.
pub async fn handle_voice_state_update(
    tracker: &TrackerHandle,
    _ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    let notification = RawVoiceStateNotification::from_voice_states(old.as_ref(), &new, Utc::now());

    if let Err(e) = tracker.send(TrackerEvent::Voice(notification)).await {
        tracing::error!(
            "Failed to forward voice state update for user {}: {}",
            new.user_id,
            e
        );
    }
}
