//! Durable storage of attendance sessions.
//!
//! Every operation runs under a timeout. Timeouts are retried with exponential
//! backoff up to a configured bound before [`StoreError::Timeout`] is surfaced.

use std::future::Future;
use std::time::Duration;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    config::Config,
    data::{attendance_session::AttendanceSessionRepository, open_session::OpenSessionRepository},
    error::store::StoreError,
    model::session::{AttendanceSession, OpenSession, SessionFilter, SessionTransition},
};

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
/// Upper bound on a single backoff step.
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Timeout and retry bounds applied to every store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubled after each further attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.store_timeout,
            max_retries: config.store_max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_retries: 3,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

/// Runs `operation` under the policy's timeout, retrying retryable failures.
///
/// # Arguments
/// - `policy` - Timeout and retry bounds
/// - `name` - Operation name used in log messages
/// - `operation` - Produces a fresh attempt each time it is called
///
/// # Returns
/// - `Ok(T)` - An attempt succeeded
/// - `Err(StoreError::Timeout)` - Every attempt timed out
/// - `Err(StoreError)` - A non-retryable failure, returned immediately
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    name: &str,
    operation: F,
) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0;

    loop {
        let result = match tokio::time::timeout(policy.timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(policy.timeout)),
        };

        match result {
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                tracing::warn!(
                    "Store operation {} failed ({}), retry {}/{} in {:?}",
                    name,
                    err,
                    attempt,
                    policy.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}

/// Session store backed by the `attendance_session` and `open_session` tables.
#[derive(Clone)]
pub struct SessionStore {
    db: DatabaseConnection,
    policy: RetryPolicy,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection, policy: RetryPolicy) -> Self {
        Self { db, policy }
    }

    /// Persists a closed session and removes its open snapshot row.
    ///
    /// # Returns
    /// - `Ok(())` - Session stored
    /// - `Err(StoreError::DuplicateSession)` - A session with the same key is already stored
    /// - `Err(StoreError::Timeout)` - Retries exhausted
    /// - `Err(StoreError::Database)` - Database error, nothing written
    pub async fn record(&self, session: &AttendanceSession) -> Result<(), StoreError> {
        with_retry(&self.policy, "record", || self.record_once(session)).await
    }

    /// Gets the open session snapshot used to rebuild tracker state after a restart.
    pub async fn open_sessions(&self) -> Result<Vec<OpenSession>, StoreError> {
        with_retry(&self.policy, "open_sessions", || async {
            Ok(OpenSessionRepository::new(&self.db).get_all().await?)
        })
        .await
    }

    /// Gets closed sessions matching `filter`, ordered by `joined_at` ascending.
    pub async fn query(&self, filter: &SessionFilter) -> Result<Vec<AttendanceSession>, StoreError> {
        with_retry(&self.policy, "query", || async {
            Ok(AttendanceSessionRepository::new(&self.db)
                .query(filter)
                .await?)
        })
        .await
    }

    /// Applies a batch of tracker transitions in one transaction.
    ///
    /// Closed sessions that are already stored are skipped, so a batch that is
    /// retried after a partial failure elsewhere stays idempotent.
    ///
    /// # Returns
    /// - `Ok(())` - Every transition applied or skipped as a duplicate
    /// - `Err(StoreError)` - Nothing from the batch was written
    pub async fn commit(&self, transitions: &[SessionTransition]) -> Result<(), StoreError> {
        if transitions.is_empty() {
            return Ok(());
        }

        with_retry(&self.policy, "commit", || self.commit_once(transitions)).await
    }

    async fn record_once(&self, session: &AttendanceSession) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        let closed_repo = AttendanceSessionRepository::new(&txn);
        let key = session.key();
        if closed_repo.find_by_key(&key).await?.is_some() {
            return Err(StoreError::DuplicateSession {
                user_id: key.user_id,
                channel_id: key.channel_id,
                joined_at: key.joined_at,
            });
        }

        closed_repo.insert(session).await?;
        OpenSessionRepository::new(&txn).delete(&key).await?;

        txn.commit().await?;

        Ok(())
    }

    async fn commit_once(&self, transitions: &[SessionTransition]) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        let closed_repo = AttendanceSessionRepository::new(&txn);
        let open_repo = OpenSessionRepository::new(&txn);

        for transition in transitions {
            match transition {
                SessionTransition::Opened(session) | SessionTransition::Refreshed(session) => {
                    open_repo.upsert(session).await?;
                }
                SessionTransition::Closed(session) => {
                    let key = session.key();
                    if closed_repo.find_by_key(&key).await?.is_some() {
                        tracing::debug!(
                            "Session for user {} in channel {} joined at {} already recorded, skipping",
                            key.user_id,
                            key.channel_id,
                            key.joined_at
                        );
                    } else {
                        closed_repo.insert(session).await?;
                    }
                    open_repo.delete(&key).await?;
                }
            }
        }

        txn.commit().await?;

        Ok(())
    }
}
