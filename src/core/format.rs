//! Formatting helpers for the informational commands.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Discord epoch (2015-01-01T00:00:00Z) in Unix milliseconds.
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time embedded in a snowflake id, in Unix milliseconds.
#[must_use]
pub const fn snowflake_millis(id: u64) -> u64 {
    (id >> 22) + DISCORD_EPOCH_MS
}

/// Creation time embedded in a snowflake id.
#[must_use]
pub fn snowflake_datetime(id: u64) -> DateTime<Utc> {
    i64::try_from(snowflake_millis(id))
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

/// Milliseconds between the creation of two snowflakes, zero if `later` is older.
#[must_use]
pub const fn snowflake_gap_millis(earlier: u64, later: u64) -> u64 {
    snowflake_millis(later).saturating_sub(snowflake_millis(earlier))
}

/// `3d 4h 5m 6s`
#[must_use]
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

/// Discord's relative timestamp markup, rendered client side ("3 days ago").
#[must_use]
pub fn relative_timestamp(unix_seconds: i64) -> String {
    format!("<t:{unix_seconds}:R>")
}

/// `ANIMATED_ICON` becomes `Animated icon`.
#[must_use]
pub fn prettify_feature(feature: &str) -> String {
    let lowered = feature.to_lowercase().replace('_', " ");
    let mut chars = lowered.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Singular or plural noun for a count: `1 message`, `3 messages`.
#[must_use]
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Milliseconds for a latency, or `n/a` when the gateway has not measured one yet.
#[must_use]
pub fn format_latency(latency: Option<Duration>) -> String {
    latency.map_or_else(|| "n/a".to_string(), |d| format!("{}ms", d.as_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 0h 0m 0s");
        assert_eq!(
            format_uptime(Duration::from_secs(3 * 86_400 + 4 * 3600 + 5 * 60 + 6)),
            "3d 4h 5m 6s"
        );
    }

    #[test]
    fn test_prettify_feature() {
        assert_eq!(prettify_feature("ANIMATED_ICON"), "Animated icon");
        assert_eq!(prettify_feature("COMMUNITY"), "Community");
        assert_eq!(prettify_feature(""), "");
    }

    #[test]
    fn test_snowflakes() {
        // 175928847299117063 was created at 2016-04-30T11:18:25.796Z
        let id = 175_928_847_299_117_063;
        assert_eq!(snowflake_millis(id), 1_462_015_105_796);
        assert_eq!(snowflake_datetime(id).timestamp(), 1_462_015_105);

        let later = id + (250 << 22);
        assert_eq!(snowflake_gap_millis(id, later), 250);
        assert_eq!(snowflake_gap_millis(later, id), 0);
    }

    #[test]
    fn test_pluralize_and_latency() {
        assert_eq!(pluralize(1, "message"), "1 message");
        assert_eq!(pluralize(0, "message"), "0 messages");
        assert_eq!(format_latency(None), "n/a");
        assert_eq!(format_latency(Some(Duration::from_millis(42))), "42ms");
        assert_eq!(relative_timestamp(1_700_000_000), "<t:1700000000:R>");
    }
}
