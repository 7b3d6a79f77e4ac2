use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Inclusive time window used to filter sessions. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Unbounded range matching every session.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The window of length `window` ending at `now`.
    ///
    /// A window reaching past the earliest representable time leaves the start open.
    pub fn last(window: TimeDelta, now: DateTime<Utc>) -> Self {
        Self {
            start: now.checked_sub_signed(window),
            end: Some(now),
        }
    }

    /// Length of the part of `[from, to]` that falls inside this range.
    pub fn clip(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> TimeDelta {
        let from = self.start.map_or(from, |start| from.max(start));
        let to = self.end.map_or(to, |end| to.min(end));

        if to > from {
            to - from
        } else {
            TimeDelta::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn clips_to_range_bounds() {
        let range = TimeRange::between(at(100), at(200));

        assert_eq!(range.clip(at(50), at(150)), TimeDelta::seconds(50));
        assert_eq!(range.clip(at(120), at(180)), TimeDelta::seconds(60));
        assert_eq!(range.clip(at(0), at(50)), TimeDelta::zero());
        assert_eq!(TimeRange::all().clip(at(0), at(50)), TimeDelta::seconds(50));
    }

    #[test]
    fn last_window_ends_now() {
        let range = TimeRange::last(TimeDelta::seconds(60), at(1000));

        assert_eq!(range, TimeRange::between(at(940), at(1000)));
    }

    #[test]
    fn oversized_window_leaves_start_open() {
        let range = TimeRange::last(TimeDelta::seconds(9_000_000_000_000), at(1000));

        assert_eq!(range.start, None);
        assert_eq!(range.end, Some(at(1000)));
    }
}
