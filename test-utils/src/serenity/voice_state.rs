//! Test factory for creating Serenity VoiceState objects.

use serenity::all::VoiceState;

/// Creates a test Serenity VoiceState.
///
/// All flags (mute, deaf, streaming, ...) are off.
///
/// # Arguments
/// - `guild_id` - Discord guild ID (snowflake)
/// - `user_id` - Discord user ID (snowflake)
/// - `channel_id` - Voice channel the user is connected to, `None` when disconnected
///
/// # Returns
/// - `VoiceState` - A valid Serenity VoiceState struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a VoiceState (indicates invalid test data)
pub fn create_test_voice_state(guild_id: u64, user_id: u64, channel_id: Option<u64>) -> VoiceState {
    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "channel_id": channel_id.map(|id| id.to_string()),
        "user_id": user_id.to_string(),
        "session_id": format!("session-{}", user_id),
        "deaf": false,
        "mute": false,
        "self_deaf": false,
        "self_mute": false,
        "self_stream": false,
        "self_video": false,
        "suppress": false,
        "request_to_speak_timestamp": null,
    }))
    .expect("Failed to create test voice state - invalid JSON structure")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_connected_voice_state() {
        let state = create_test_voice_state(10, 20, Some(30));

        assert_eq!(state.guild_id.map(|id| id.get()), Some(10));
        assert_eq!(state.user_id.get(), 20);
        assert_eq!(state.channel_id.map(|id| id.get()), Some(30));
    }

    #[test]
    fn creates_disconnected_voice_state() {
        let state = create_test_voice_state(10, 20, None);

        assert!(state.channel_id.is_none());
    }
}
