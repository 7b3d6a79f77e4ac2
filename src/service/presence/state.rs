//! In-memory presence state.
//!
//! [`PresenceState`] is a plain state machine: every method takes the event's
//! time explicitly and returns the [`SessionTransition`]s it produced. It never
//! touches the store, so the tracker decides how transitions are persisted and
//! tests can drive it without a runtime.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    config::TrackedChannels,
    model::{
        notification::{VoiceSnapshot, VoiceStateNotification},
        session::{AttendanceSession, CloseReason, OpenSession, PresenceKey, SessionTransition},
    },
};

/// Latest notification time processed for a user.
#[derive(Debug, Clone)]
struct Watermark {
    at: DateTime<Utc>,
    /// Channels of sessions that both opened and closed at `at`.
    closed_at_mark: BTreeSet<u64>,
}

pub struct PresenceState {
    tracked: TrackedChannels,
    grace_period: TimeDelta,
    connected: bool,
    open: HashMap<PresenceKey, OpenSession>,
    watermarks: HashMap<u64, Watermark>,
}

impl PresenceState {
    /// Creates an empty state. The gateway counts as disconnected until
    /// [`connection_restored`](Self::connection_restored) is called.
    pub fn new(tracked: TrackedChannels, grace_period: TimeDelta) -> Self {
        Self {
            tracked,
            grace_period,
            connected: false,
            open: HashMap::new(),
            watermarks: HashMap::new(),
        }
    }

    /// Open sessions, optionally limited to one guild, ordered by join time.
    pub fn open_sessions(&self, guild_id: Option<u64>) -> Vec<OpenSession> {
        let mut sessions: Vec<OpenSession> = self
            .open
            .values()
            .filter(|s| guild_id.map_or(true, |id| s.guild_id == id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.joined_at, s.user_id, s.channel_id));
        sessions
    }

    pub fn open_session(&self, user_id: u64, channel_id: u64) -> Option<&OpenSession> {
        self.open.get(&PresenceKey {
            user_id,
            channel_id,
        })
    }

    /// Loads sessions from the store's snapshot after a restart.
    ///
    /// Restored sessions are unconfirmed: the bot has no evidence the users are
    /// still connected until a voice snapshot or a voice event says so.
    pub fn restore(&mut self, sessions: Vec<OpenSession>) {
        for mut session in sessions {
            session.confirmed = false;
            self.open.insert(session.presence_key(), session);
        }
    }

    /// Applies one voice-state notification.
    ///
    /// Stale notifications (older than the user's last processed one) are
    /// ignored. Every open session of the user in the guild outside the new
    /// channel is closed at the notification time, then a session in the new
    /// channel is opened or refreshed if that channel is tracked.
    pub fn apply(&mut self, notification: &VoiceStateNotification) -> Vec<SessionTransition> {
        let user_id = notification.user_id;
        let at = notification.timestamp;

        if let Some(mark) = self.watermarks.get(&user_id) {
            if at < mark.at {
                tracing::debug!(
                    "Ignoring stale voice update for user {} at {} (last processed {})",
                    user_id,
                    at,
                    mark.at
                );
                return Vec::new();
            }
        }

        let target = notification
            .new_channel_id
            .filter(|channel_id| self.tracked.contains(*channel_id));

        let mut transitions = Vec::new();

        let reason = if target.is_some() {
            CloseReason::Moved
        } else {
            CloseReason::Left
        };
        let mut stale_keys: Vec<PresenceKey> = self
            .open
            .values()
            .filter(|s| {
                s.user_id == user_id
                    && s.guild_id == notification.guild_id
                    && Some(s.channel_id) != target
            })
            .map(OpenSession::presence_key)
            .collect();
        stale_keys.sort();

        let mut closed_now = Vec::new();
        for key in stale_keys {
            if let Some(session) = self.open.remove(&key) {
                let closed = session.close(at, reason);
                if closed.joined_at == at {
                    closed_now.push(closed.channel_id);
                }
                transitions.push(SessionTransition::Closed(closed));
            }
        }

        self.advance_watermark(user_id, at, closed_now);

        if let Some(channel_id) = target {
            let key = PresenceKey {
                user_id,
                channel_id,
            };

            if let Some(session) = self.open.get_mut(&key) {
                session.last_activity_at = session.last_activity_at.max(at);
                session.confirmed = true;
                transitions.push(SessionTransition::Refreshed(session.clone()));
            } else if self.closed_at_mark(user_id, channel_id, at) {
                tracing::debug!(
                    "Not reopening session for user {} in channel {} already closed at {}",
                    user_id,
                    channel_id,
                    at
                );
            } else {
                let session = OpenSession::new(notification.guild_id, user_id, channel_id, at);
                self.open.insert(key, session.clone());
                transitions.push(SessionTransition::Opened(session));
            }
        }

        transitions
    }

    /// Marks every open session unconfirmed after the gateway connection dropped.
    pub fn connection_lost(&mut self) -> Vec<SessionTransition> {
        self.connected = false;

        let mut transitions = Vec::new();
        for session in self.open.values_mut().filter(|s| s.confirmed) {
            session.confirmed = false;
            transitions.push(SessionTransition::Refreshed(session.clone()));
        }
        transitions
    }

    /// Records that the gateway connection is healthy again.
    ///
    /// When the gateway resumed and replayed the missed events, the open
    /// sessions are accurate and become confirmed at `at`. Otherwise they stay
    /// unconfirmed until a voice snapshot reconciles their guild.
    pub fn connection_restored(
        &mut self,
        replayed: bool,
        at: DateTime<Utc>,
    ) -> Vec<SessionTransition> {
        self.connected = true;

        if !replayed {
            return Vec::new();
        }

        let mut transitions = Vec::new();
        for session in self.open.values_mut().filter(|s| !s.confirmed) {
            session.confirmed = true;
            session.last_activity_at = session.last_activity_at.max(at);
            transitions.push(SessionTransition::Refreshed(session.clone()));
        }
        transitions
    }

    /// Reconciles a guild's open sessions against who is actually connected.
    ///
    /// Sessions present in the snapshot are confirmed. Sessions missing from it
    /// are closed at their last known activity. Members present in a tracked
    /// channel without an open session get one opened at the snapshot time.
    pub fn reconcile(&mut self, snapshot: &VoiceSnapshot) -> Vec<SessionTransition> {
        let mut transitions = Vec::new();

        let mut keys: Vec<PresenceKey> = self
            .open
            .values()
            .filter(|s| s.guild_id == snapshot.guild_id)
            .map(OpenSession::presence_key)
            .collect();
        keys.sort();

        for key in keys {
            if snapshot.contains(key.user_id, key.channel_id) {
                if let Some(session) = self.open.get_mut(&key) {
                    session.confirmed = true;
                    session.last_activity_at = session.last_activity_at.max(snapshot.taken_at);
                    transitions.push(SessionTransition::Refreshed(session.clone()));
                }
            } else if let Some(session) = self.open.remove(&key) {
                let left_at = session.last_activity_at;
                transitions.push(SessionTransition::Closed(
                    session.close(left_at, CloseReason::Reconciled),
                ));
            }
        }

        for &(user_id, channel_id) in &snapshot.members {
            if !self.tracked.contains(channel_id) {
                continue;
            }

            let key = PresenceKey {
                user_id,
                channel_id,
            };
            if self.open.contains_key(&key) {
                continue;
            }

            let session = OpenSession::new(snapshot.guild_id, user_id, channel_id, snapshot.taken_at);
            self.open.insert(key, session.clone());
            transitions.push(SessionTransition::Opened(session));
        }

        transitions
    }

    /// Periodic maintenance.
    ///
    /// While connected, confirmed sessions get a heartbeat at `now`.
    /// Unconfirmed sessions whose grace period has run out are closed at their
    /// last known activity. Watermarks of users without open sessions are
    /// dropped once they are older than the grace period.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<SessionTransition> {
        let mut transitions = Vec::new();

        let mut expired: Vec<PresenceKey> = self
            .open
            .values()
            .filter(|s| {
                !s.confirmed
                    && s.last_activity_at
                        .checked_add_signed(self.grace_period)
                        .is_some_and(|deadline| deadline <= now)
            })
            .map(OpenSession::presence_key)
            .collect();
        expired.sort();

        for key in expired {
            if let Some(session) = self.open.remove(&key) {
                let left_at = session.last_activity_at;
                transitions.push(SessionTransition::Closed(
                    session.close(left_at, CloseReason::Expired),
                ));
            }
        }

        if self.connected {
            for session in self.open.values_mut().filter(|s| s.confirmed) {
                if session.last_activity_at < now {
                    session.last_activity_at = now;
                    transitions.push(SessionTransition::Refreshed(session.clone()));
                }
            }
        }

        self.prune_watermarks(now);

        transitions
    }

    /// Closes every open session at the end of the tracking period.
    ///
    /// Confirmed sessions close at `at`; unconfirmed ones at their last known
    /// activity.
    pub fn close_all(&mut self, at: DateTime<Utc>) -> Vec<SessionTransition> {
        let mut sessions: Vec<OpenSession> = self.open.drain().map(|(_, s)| s).collect();
        sessions.sort_by_key(|s| (s.joined_at, s.user_id, s.channel_id));

        sessions
            .into_iter()
            .map(|session| {
                let left_at = if session.confirmed {
                    at
                } else {
                    session.last_activity_at
                };
                SessionTransition::Closed(session.close(left_at, CloseReason::Shutdown))
            })
            .collect()
    }

    fn prune_watermarks(&mut self, now: DateTime<Utc>) {
        let active: BTreeSet<u64> = self.open.keys().map(|key| key.user_id).collect();
        let grace_period = self.grace_period;

        self.watermarks.retain(|user_id, mark| {
            active.contains(user_id)
                || mark
                    .at
                    .checked_add_signed(grace_period)
                    .map_or(true, |expires| expires > now)
        });
    }

    #[cfg(test)]
    pub(crate) fn watermark_count(&self) -> usize {
        self.watermarks.len()
    }

    fn advance_watermark(&mut self, user_id: u64, at: DateTime<Utc>, closed: Vec<u64>) {
        let mark = self.watermarks.entry(user_id).or_insert_with(|| Watermark {
            at,
            closed_at_mark: BTreeSet::new(),
        });

        if at > mark.at {
            mark.at = at;
            mark.closed_at_mark.clear();
        }
        mark.closed_at_mark.extend(closed);
    }

    fn closed_at_mark(&self, user_id: u64, channel_id: u64, at: DateTime<Utc>) -> bool {
        self.watermarks
            .get(&user_id)
            .is_some_and(|mark| mark.at == at && mark.closed_at_mark.contains(&channel_id))
    }
}

/// Closed sessions contained in a batch of transitions.
pub fn closed_sessions(transitions: &[SessionTransition]) -> impl Iterator<Item = &AttendanceSession> {
    transitions.iter().filter_map(|t| match t {
        SessionTransition::Closed(session) => Some(session),
        _ => None,
    })
}
