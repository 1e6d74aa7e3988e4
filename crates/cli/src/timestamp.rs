//! Timestamp parsing and formatting for CLI arguments

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use synth_lib::alerts::format_rfc3339;
use synth_lib::time_bucket::DAY_MS;
use synth_lib::TimestampMs;

/// Parse an RFC3339 time or epoch milliseconds; `None` means now
pub fn parse_or_now(value: Option<&str>) -> Result<TimestampMs> {
    match value {
        Some(raw) => parse(raw),
        None => now(),
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now() -> Result<TimestampMs> {
    TimestampMs::try_from(Utc::now().timestamp_millis()).context("System clock is before 1970")
}

/// Start of the epoch-relative day containing `ts`
pub fn start_of_day(ts: TimestampMs) -> TimestampMs {
    ts - ts % DAY_MS
}

pub fn parse(raw: &str) -> Result<TimestampMs> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw
            .parse::<TimestampMs>()
            .with_context(|| format!("Timestamp '{}' is out of range", raw));
    }

    let parsed = DateTime::parse_from_rfc3339(raw).with_context(|| {
        format!("Invalid timestamp '{}': expected RFC3339 or epoch milliseconds", raw)
    })?;
    let millis = parsed.timestamp_millis();
    if millis < 0 {
        bail!("Timestamp '{}' is before 1970", raw);
    }
    Ok(millis as TimestampMs)
}

/// Format epoch milliseconds as RFC3339 (UTC, second precision)
pub fn format(ts: TimestampMs) -> String {
    format_rfc3339(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(parse("1704067200000").unwrap(), 1_704_067_200_000);
        assert_eq!(parse(" 0 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(parse("2024-01-01T00:00:00Z").unwrap(), 1_704_067_200_000);
        assert_eq!(parse("2024-01-01T02:00:00+02:00").unwrap(), 1_704_067_200_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(parse("1969-12-31T23:59:59Z").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format(1_704_117_600_000), "2024-01-01T14:00:00Z");
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(start_of_day(1_704_117_600_000), 1_704_067_200_000);
    }
}
