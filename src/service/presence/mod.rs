//! Presence tracker.
//!
//! A single consumer task owns all mutations of the presence state and reads
//! [`TrackerEvent`]s from a bounded channel in arrival order. Each event is
//! applied and its transitions committed while the write lock is held, so a
//! [`PresenceView`] reader never observes half of a move.
//!
//! Store failures never roll back in-memory state. Closed sessions that could
//! not be written are queued and retried on the next sweep together with a
//! resync of every open session.

pub mod state;

#[cfg(test)]
mod test;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, RwLock, RwLockReadGuard};

use crate::{
    error::AppError,
    model::{
        notification::{RawVoiceStateNotification, VoiceSnapshot, VoiceStateNotification},
        session::{AttendanceSession, OpenSession, SessionTransition},
    },
    service::session_store::SessionStore,
    util::time::normalize,
};

pub use state::PresenceState;

/// Capacity of the event channel between the gateway handler and the tracker.
pub const EVENT_BUFFER: usize = 1024;

/// Input to the presence tracker.
#[derive(Debug)]
pub enum TrackerEvent {
    /// A voice-state change, validated by the tracker.
    Voice(RawVoiceStateNotification),
    /// The gateway connection dropped.
    ConnectionLost,
    /// The gateway connection is healthy again. `replayed` is set when the
    /// session was resumed and missed events were replayed.
    ConnectionRestored {
        replayed: bool,
        at: DateTime<Utc>,
    },
    /// Voice states of a guild that became available.
    Snapshot(VoiceSnapshot),
    /// Periodic heartbeat, expiry and retry pass.
    Sweep(DateTime<Utc>),
    /// End of the tracking period. `done` is signalled once every open session
    /// has been closed and persisted.
    Shutdown {
        at: DateTime<Utc>,
        done: oneshot::Sender<()>,
    },
}

/// Sending side of the tracker's event channel.
#[derive(Clone)]
pub struct TrackerHandle {
    sender: mpsc::Sender<TrackerEvent>,
}

impl TrackerHandle {
    /// Queues an event for the tracker.
    ///
    /// # Returns
    /// - `Ok(())` - Event queued
    /// - `Err(AppError::TrackerStopped)` - The tracker task has exited
    pub async fn send(&self, event: TrackerEvent) -> Result<(), AppError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| AppError::TrackerStopped)
    }

    /// Closes all open sessions and waits until they are persisted.
    pub async fn shutdown(&self, at: DateTime<Utc>) -> Result<(), AppError> {
        let (done, finished) = oneshot::channel();
        self.send(TrackerEvent::Shutdown { at, done }).await?;
        finished.await.map_err(|_| AppError::TrackerStopped)
    }
}

/// Read-only access to the tracker's open sessions.
#[derive(Clone)]
pub struct PresenceView {
    state: Arc<RwLock<PresenceState>>,
}

impl PresenceView {
    /// Currently open sessions, optionally limited to one guild.
    pub async fn open_sessions(&self, guild_id: Option<u64>) -> Vec<OpenSession> {
        self.state.read().await.open_sessions(guild_id)
    }

    /// Locks the presence state for reading.
    ///
    /// The tracker applies and commits each event under the write lock, so no
    /// transition is stored while the guard is held. Store reads made under
    /// the guard agree with the open sessions it shows.
    pub async fn read(&self) -> RwLockReadGuard<'_, PresenceState> {
        self.state.read().await
    }
}

pub struct PresenceTracker {
    state: Arc<RwLock<PresenceState>>,
    store: SessionStore,
    receiver: mpsc::Receiver<TrackerEvent>,
    /// Closed sessions whose commit failed, oldest first.
    pending: Vec<AttendanceSession>,
    /// Set when an open-session write failed; the next sweep rewrites every
    /// open session.
    resync: bool,
}

impl PresenceTracker {
    /// Creates a tracker around `state`.
    ///
    /// # Returns
    /// - The tracker, to be driven by [`run`](Self::run)
    /// - A handle for sending events
    /// - A view for reading open sessions
    pub fn new(state: PresenceState, store: SessionStore) -> (Self, TrackerHandle, PresenceView) {
        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        let state = Arc::new(RwLock::new(state));

        let tracker = Self {
            state: state.clone(),
            store,
            receiver,
            pending: Vec::new(),
            resync: false,
        };

        (tracker, TrackerHandle { sender }, PresenceView { state })
    }

    /// Creates a tracker whose state is rebuilt from the store's open session snapshot.
    pub async fn restore(
        mut state: PresenceState,
        store: SessionStore,
    ) -> Result<(Self, TrackerHandle, PresenceView), AppError> {
        let sessions = store.open_sessions().await?;
        if !sessions.is_empty() {
            tracing::info!(
                "Restored {} open sessions awaiting confirmation",
                sessions.len()
            );
        }
        state.restore(sessions);

        Ok(Self::new(state, store))
    }

    /// Processes events until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("Presence tracker started");

        while let Some(event) = self.receiver.recv().await {
            if let TrackerEvent::Shutdown { at, done } = event {
                self.shutdown(at).await;
                let _ = done.send(());
                tracing::info!("Presence tracker stopped");
                return;
            }

            self.handle(event).await;
        }

        tracing::info!("Presence tracker channel closed");
    }

    /// Applies one event and persists the resulting transitions.
    ///
    /// Shutdown events are handled by [`run`](Self::run).
    pub async fn handle(&mut self, event: TrackerEvent) {
        let state = self.state.clone();
        let mut state = state.write().await;

        let transitions = match event {
            TrackerEvent::Voice(raw) => match VoiceStateNotification::try_from(raw) {
                Ok(notification) => {
                    tracing::debug!(
                        "Voice update for user {} in guild {}: {:?} -> {:?}",
                        notification.user_id,
                        notification.guild_id,
                        notification.old_channel_id,
                        notification.new_channel_id
                    );
                    state.apply(&notification)
                }
                Err(e) => {
                    tracing::warn!("Dropping voice update: {}", e);
                    return;
                }
            },
            TrackerEvent::ConnectionLost => {
                tracing::info!("Gateway connection lost, open sessions awaiting confirmation");
                state.connection_lost()
            }
            TrackerEvent::ConnectionRestored { replayed, at } => {
                tracing::info!("Gateway connection restored (replayed: {})", replayed);
                state.connection_restored(replayed, normalize(at))
            }
            TrackerEvent::Snapshot(snapshot) => {
                tracing::debug!(
                    "Reconciling guild {} against {} connected members",
                    snapshot.guild_id,
                    snapshot.members.len()
                );
                state.reconcile(&snapshot)
            }
            TrackerEvent::Sweep(now) => {
                let mut transitions = self.take_retries(&state);
                transitions.extend(state.sweep(normalize(now)));
                transitions
            }
            TrackerEvent::Shutdown { .. } => return,
        };

        for session in state::closed_sessions(&transitions) {
            tracing::info!(
                "Closed session for user {} in channel {} ({}, {}s)",
                session.user_id,
                session.channel_id,
                session.close_reason,
                session.duration().num_seconds()
            );
        }

        self.persist(transitions).await;
    }

    /// Closes every open session and persists them along with any queued retries.
    async fn shutdown(&mut self, at: DateTime<Utc>) {
        let state = self.state.clone();
        let mut state = state.write().await;

        let mut transitions = self.take_retries(&state);
        let closed = state.close_all(normalize(at));
        tracing::info!("Closing {} open sessions for shutdown", closed.len());
        transitions.extend(closed);

        self.persist(transitions).await;

        if !self.pending.is_empty() {
            tracing::error!(
                "{} closed sessions could not be stored before shutdown",
                self.pending.len()
            );
        }
    }

    /// Drains the retry queue into transitions to commit.
    fn take_retries(&mut self, state: &PresenceState) -> Vec<SessionTransition> {
        let mut transitions: Vec<SessionTransition> = self
            .pending
            .drain(..)
            .map(SessionTransition::Closed)
            .collect();

        if std::mem::take(&mut self.resync) {
            transitions.extend(
                state
                    .open_sessions(None)
                    .into_iter()
                    .map(SessionTransition::Refreshed),
            );
        }

        if !transitions.is_empty() {
            tracing::info!("Retrying {} queued session writes", transitions.len());
        }

        transitions
    }

    async fn persist(&mut self, transitions: Vec<SessionTransition>) {
        if let Err(e) = self.store.commit(&transitions).await {
            tracing::error!(
                "Failed to store {} session transitions, queued for retry: {}",
                transitions.len(),
                e
            );

            for transition in transitions {
                match transition {
                    SessionTransition::Closed(session) => self.pending.push(session),
                    SessionTransition::Opened(_) | SessionTransition::Refreshed(_) => {
                        self.resync = true
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> &[AttendanceSession] {
        &self.pending
    }
}
