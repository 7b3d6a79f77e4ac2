mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;

use chrono::Utc;

use crate::{
    bot::handler::Handler,
    config::Config,
    error::AppError,
    scheduler::presence_sweep,
    service::{
        presence::{PresenceState, PresenceTracker},
        session_store::{RetryPolicy, SessionStore},
    },
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let store = SessionStore::new(db, RetryPolicy::from_config(&config));

    let state = PresenceState::new(config.tracked_channels.clone(), config.grace_period);
    let (tracker, tracker_handle, presence) = PresenceTracker::restore(state, store.clone()).await?;
    let tracker_task = tokio::spawn(tracker.run());

    let mut sweep_scheduler =
        presence_sweep::start_scheduler(&config.sweep_schedule, tracker_handle.clone()).await?;

    let handler = Handler::new(
        tracker_handle.clone(),
        store,
        presence,
        config.command_prefix.clone(),
    );
    let mut client = bot::start::build_client(&config, handler).await?;
    let shard_manager = client.shard_manager.clone();

    tracing::info!("Starting Discord bot...");

    // Start Discord bot in a separate task
    let bot_task = tokio::spawn(async move {
        if let Err(e) = client.start().await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        }
        _ = bot_task => {
            tracing::warn!("Discord bot stopped, shutting down");
        }
    }

    shard_manager.shutdown_all().await;
    if let Err(e) = sweep_scheduler.shutdown().await {
        tracing::warn!("Failed to stop sweep scheduler: {}", e);
    }

    tracker_handle.shutdown(Utc::now()).await?;
    if let Err(e) = tracker_task.await {
        tracing::error!("Presence tracker task failed: {}", e);
    }

    Ok(())
}
