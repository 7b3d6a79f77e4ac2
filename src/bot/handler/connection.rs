//! Gateway connection lifecycle handlers.

use chrono::Utc;
use serenity::all::{ConnectionStage, Context, ResumedEvent, ShardStageUpdateEvent};

use crate::service::presence::{TrackerEvent, TrackerHandle};

/// Handles a resumed gateway session.
///
/// Discord replays every event missed while disconnected before `resume` is
/// dispatched, so the tracker's open sessions are accurate again.
pub async fn handle_resume(tracker: &TrackerHandle, _ctx: Context, _event: ResumedEvent) {
    tracing::info!("Gateway session resumed");

    if let Err(e) = tracker
        .send(TrackerEvent::ConnectionRestored {
            replayed: true,
            at: Utc::now(),
        })
        .await
    {
        tracing::error!("Failed to notify tracker of resume: {}", e);
    }
}

/// Handles shard connection stage changes.
///
/// Leaving the `Connected` stage means voice events may be missed from now on.
pub async fn handle_shard_stage_update(
    tracker: &TrackerHandle,
    _ctx: Context,
    event: ShardStageUpdateEvent,
) {
    tracing::debug!(
        "Shard {} stage: {:?} -> {:?}",
        event.shard_id.0,
        event.old,
        event.new
    );

    if !is_connection_loss(event.old, event.new) {
        return;
    }

    tracing::warn!("Shard {} lost its gateway connection", event.shard_id.0);

    if let Err(e) = tracker.send(TrackerEvent::ConnectionLost).await {
        tracing::error!("Failed to notify tracker of connection loss: {}", e);
    }
}

fn is_connection_loss(old: ConnectionStage, new: ConnectionStage) -> bool {
    old == ConnectionStage::Connected && new != ConnectionStage::Connected
}
