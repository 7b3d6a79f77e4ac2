use serenity::all::{
    Context, EventHandler, Guild, Message, Ready, ResumedEvent, ShardStageUpdateEvent, VoiceState,
};
use serenity::async_trait;

use crate::service::{
    presence::{PresenceView, TrackerHandle},
    session_store::SessionStore,
};

pub mod connection;
pub mod guild;
pub mod message;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    pub tracker: TrackerHandle,
    pub store: SessionStore,
    pub presence: PresenceView,
    pub command_prefix: String,
}

impl Handler {
    pub fn new(
        tracker: TrackerHandle,
        store: SessionStore,
        presence: PresenceView,
        command_prefix: String,
    ) -> Self {
        Self {
            tracker,
            store,
            presence,
            command_prefix,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.tracker, ctx, ready).await;
    }

    /// Called when a dropped gateway session was resumed and missed events replayed
    async fn resume(&self, ctx: Context, event: ResumedEvent) {
        connection::handle_resume(&self.tracker, ctx, event).await;
    }

    /// Called when a shard's connection stage changes
    async fn shard_stage_update(&self, ctx: Context, event: ShardStageUpdateEvent) {
        connection::handle_shard_stage_update(&self.tracker, ctx, event).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        guild::handle_guild_create(&self.tracker, ctx, guild, is_new).await;
    }

    /// Called when a user joins, leaves or moves between voice channels, or
    /// changes mute, deafen or stream state
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(&self.tracker, ctx, old, new).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }
}
