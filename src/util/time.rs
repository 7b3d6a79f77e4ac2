//! Timestamp normalization and human-readable durations.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// Truncates a timestamp to whole milliseconds.
///
/// Every timestamp entering the tracker goes through here so that stored
/// values compare and order consistently.
pub fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

/// Formats a duration as `1h 2m 3s`, `2m 3s` or `3s`.
///
/// Negative durations are shown as `0s`.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Discord timestamp markup, rendered in each reader's local time.
pub fn discord_timestamp(ts: DateTime<Utc>) -> String {
    format!("<t:{}:f>", ts.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(3723)), "1h 2m 3s");
        assert_eq!(format_duration(TimeDelta::seconds(123)), "2m 3s");
        assert_eq!(format_duration(TimeDelta::seconds(59)), "59s");
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
    }

    #[test]
    fn clamps_negative_durations() {
        assert_eq!(format_duration(TimeDelta::seconds(-5)), "0s");
    }

    #[test]
    fn truncates_to_milliseconds() {
        let ts = DateTime::from_timestamp(100, 123_456_789).unwrap();

        assert_eq!(normalize(ts).timestamp_subsec_nanos(), 123_000_000);
    }
}
