use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;

/// Builds the Discord bot client
///
/// The client is returned unstarted so the caller can keep its shard manager
/// for shutdown before moving it into a task with `client.start()`.
///
/// # Arguments
/// - `config` - Application configuration
/// - `handler` - Event handler wired to the tracker and report service
///
/// # Returns
/// - `Ok(Client)` - Client ready to start
/// - `Err(AppError)` - Client initialization failed
pub async fn build_client(config: &Config, handler: Handler) -> Result<Client, AppError> {
    // MESSAGE_CONTENT is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    Ok(client)
}
