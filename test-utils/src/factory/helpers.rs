//! Shared helper utilities for factory methods.

use chrono::{DateTime, Utc};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Timestamp `secs` seconds after the Unix epoch.
///
/// Tests describe timelines as small offsets (join at 0, leave at 100) and use
/// this to turn them into timestamps.
///
/// # Panics
/// - If `secs` is outside chrono's representable range
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("test timestamp out of range")
}
