//! Environment-based application configuration.
//!
//! All settings are read once at startup and then passed explicitly to the
//! components that need them; nothing else in the bot reads the environment.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://attendance.db?mode=rwc";
const DEFAULT_GRACE_PERIOD_SECONDS: u64 = 600;
/// One week.
const MAX_GRACE_PERIOD_SECONDS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_STORE_MAX_RETRIES: u32 = 3;
const MAX_STORE_MAX_RETRIES: u32 = 10;
const DEFAULT_SWEEP_SCHEDULE: &str = "*/30 * * * * *";
const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Voice channels whose presence is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackedChannels {
    /// Every voice channel the bot can see.
    #[default]
    All,
    /// Only the listed channel IDs.
    Only(HashSet<u64>),
}

impl TrackedChannels {
    pub fn contains(&self, channel_id: u64) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&channel_id),
        }
    }
}

pub struct Config {
    pub discord_bot_token: String,
    pub database_url: String,

    pub tracked_channels: TrackedChannels,
    /// How long an unconfirmed open session may go without a close event before
    /// it is closed at its last known activity.
    pub grace_period: chrono::Duration,
    pub sweep_schedule: String,

    pub store_timeout: Duration,
    pub store_max_retries: u32,

    pub command_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Arguments
    /// - `lookup` - Returns the value of the named variable, if set
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(AppError::ConfigErr)` - Missing token or an unparsable value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_bot_token = lookup("DISCORD_BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?;

        let tracked_channels = match lookup("TRACKED_CHANNEL_IDS") {
            Some(raw) => parse_channel_ids(&raw)?,
            None => TrackedChannels::All,
        };

        let grace_seconds: u64 =
            parse_or("GRACE_PERIOD_SECONDS", &lookup, DEFAULT_GRACE_PERIOD_SECONDS)?;
        let grace_period = Some(grace_seconds)
            .filter(|seconds| *seconds <= MAX_GRACE_PERIOD_SECONDS)
            .and_then(|seconds| i64::try_from(seconds).ok())
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "GRACE_PERIOD_SECONDS".to_string(),
                value: grace_seconds.to_string(),
                reason: format!("must be at most {}", MAX_GRACE_PERIOD_SECONDS),
            })?;

        let store_timeout_ms: u64 =
            parse_or("STORE_TIMEOUT_MS", &lookup, DEFAULT_STORE_TIMEOUT_MS)?;
        if store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "STORE_TIMEOUT_MS".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        let store_max_retries: u32 =
            parse_or("STORE_MAX_RETRIES", &lookup, DEFAULT_STORE_MAX_RETRIES)?;
        if store_max_retries > MAX_STORE_MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                name: "STORE_MAX_RETRIES".to_string(),
                value: store_max_retries.to_string(),
                reason: format!("must be at most {}", MAX_STORE_MAX_RETRIES),
            }
            .into());
        }

        Ok(Self {
            discord_bot_token,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            tracked_channels,
            grace_period,
            sweep_schedule: lookup("SWEEP_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_SWEEP_SCHEDULE.to_string()),
            store_timeout: Duration::from_millis(store_timeout_ms),
            store_max_retries,
            command_prefix: lookup("COMMAND_PREFIX")
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
        })
    }
}

fn parse_or<T, F>(name: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Parses a comma-separated channel ID list. An empty list tracks every channel.
fn parse_channel_ids(raw: &str) -> Result<TrackedChannels, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: "TRACKED_CHANNEL_IDS".to_string(),
                value: part.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<HashSet<u64>, _>>()?;

    if ids.is_empty() {
        Ok(TrackedChannels::All)
    } else {
        Ok(TrackedChannels::Only(ids))
    }
}
