//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON,
//! simulating what Discord's gateway would deliver.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::create_test_voice_state;
//!
//! // User 20 connected to channel 30 in guild 10
//! let state = create_test_voice_state(10, 20, Some(30));
//!
//! // User 20 disconnected from voice
//! let state = create_test_voice_state(10, 20, None);
//! ```
//!
//! # Available Factories
//!
//! - `voice_state::create_test_voice_state` - Create Serenity VoiceState objects

pub mod voice_state;

// Re-export commonly used functions for convenience
pub use voice_state::create_test_voice_state;
