//! Error types and user-facing error mapping.
//!
//! `AppError` is the top-level error type that wraps the domain-specific errors
//! of each layer. Errors that reach the chat command surface are converted with
//! [`AppError::user_message`], which never exposes internal details; the full
//! error is logged instead.

pub mod command;
pub mod config;
pub mod notification;
pub mod store;

use thiserror::Error;

use crate::error::{
    command::CommandError, config::ConfigError, notification::NotificationError,
    store::StoreError,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most
/// variants use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Session store failure, including timeouts and duplicate keys.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Chat command could not be parsed.
    #[error(transparent)]
    CommandErr(#[from] CommandError),

    /// Voice state notification was rejected.
    #[error(transparent)]
    NotificationErr(#[from] NotificationError),

    /// Database operation error from SeaORM outside of the session store,
    /// such as connecting or running migrations.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// JSON serialization error while building exports.
    #[error(transparent)]
    SerializeErr(#[from] serde_json::Error),

    /// The presence tracker task is no longer accepting events.
    #[error("Presence tracker is not running")]
    TrackerStopped,
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Message safe to show to the user who invoked a command.
    ///
    /// Command errors are returned as-is since they describe the user's input.
    /// Timeouts get an actionable retry hint. Everything else is logged with full
    /// details and replaced by a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::CommandErr(err) => format!("❌ {}", err),
            Self::StoreErr(StoreError::Timeout(_)) => {
                tracing::warn!("Command failed: {}", self);
                "❌ Attendance data is temporarily unavailable. Please try again shortly."
                    .to_string()
            }
            _ => {
                tracing::error!("Command failed: {}", self);
                "❌ An error occurred while processing the command.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn command_errors_are_shown_to_user() {
        let err = AppError::from(CommandError::InvalidUserMention("bob".to_string()));

        assert_eq!(
            err.user_message(),
            "❌ Invalid user mention. Use @username format."
        );
    }

    #[test]
    fn timeouts_suggest_retry() {
        let err = AppError::from(StoreError::Timeout(Duration::from_secs(5)));

        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn internal_errors_are_hidden() {
        let err = AppError::from(sea_orm::DbErr::Custom("disk I/O error at page 7".to_string()));

        let message = err.user_message();
        assert!(!message.contains("disk"));
        assert_eq!(message, "❌ An error occurred while processing the command.");
    }
}
