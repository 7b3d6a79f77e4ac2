//! Discord bot integration for voice attendance tracking.
//!
//! The bot adapter is thin: gateway events are converted into tracker events and
//! sent to the presence tracker, and chat messages are parsed into commands that
//! are answered by the report service.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild availability events, including voice state snapshots
//! - `GUILD_VOICE_STATES` - Receive voice channel join, leave and move events
//! - `GUILD_MESSAGES` - Receive chat commands in guild channels
//! - `MESSAGE_CONTENT` - Read the text of chat commands (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
