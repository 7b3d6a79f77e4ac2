use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashSet;

use crate::{
    config::TrackedChannels,
    model::{
        notification::{VoiceSnapshot, VoiceStateNotification},
        session::{AttendanceSession, CloseReason, SessionTransition},
    },
    service::presence::PresenceState,
};
use test_utils::factory::at;

mod grace;

const GUILD: u64 = 1;
const USER_A: u64 = 100;
const USER_B: u64 = 101;
const C1: u64 = 10;
const C2: u64 = 20;
const UNTRACKED: u64 = 99;

fn state() -> PresenceState {
    PresenceState::new(
        TrackedChannels::Only(HashSet::from([C1, C2])),
        TimeDelta::seconds(600),
    )
}

fn voice(user_id: u64, old: Option<u64>, new: Option<u64>, secs: i64) -> VoiceStateNotification {
    VoiceStateNotification {
        guild_id: GUILD,
        user_id,
        old_channel_id: old,
        new_channel_id: new,
        timestamp: at(secs),
    }
}

fn snapshot(members: &[(u64, u64)], secs: i64) -> VoiceSnapshot {
    let mut members = members.to_vec();
    members.sort_unstable();
    VoiceSnapshot {
        guild_id: GUILD,
        members,
        taken_at: at(secs),
    }
}

fn closed(transitions: &[SessionTransition]) -> Vec<AttendanceSession> {
    transitions
        .iter()
        .filter_map(|t| match t {
            SessionTransition::Closed(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn opened(transitions: &[SessionTransition]) -> usize {
    transitions
        .iter()
        .filter(|t| matches!(t, SessionTransition::Opened(_)))
        .count()
}

fn span(session: &AttendanceSession) -> (u64, DateTime<Utc>, DateTime<Utc>, CloseReason) {
    (
        session.channel_id,
        session.joined_at,
        session.left_at,
        session.close_reason,
    )
}
