//! Logical timestamps carried by posts and comments.
//!
//! The feed transmits timestamps as ISO-8601 strings. The raw text is kept as
//! received so re-serialisation is lossless; ordering uses the parsed instant
//! in epoch milliseconds, with missing or unparseable values ordering as `0`.
//! Values without an offset, including bare dates, are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw logical timestamp as received from the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalTimestamp(Option<String>);

impl LogicalTimestamp {
    /// Wrap a raw timestamp string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    /// A timestamp with no value.
    #[must_use]
    pub const fn missing() -> Self {
        Self(None)
    }

    /// Build a timestamp from a UTC instant, using RFC 3339 with milliseconds.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self::new(instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }

    /// Borrow the raw text, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Parse the timestamp into a UTC instant.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(self.0.as_deref()?.trim())
    }

    /// Ordering key in epoch milliseconds; `0` when missing or unparseable.
    #[must_use]
    pub fn sort_key(&self) -> i64 {
        self.instant().map_or(0, |instant| instant.timestamp_millis())
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

impl From<&str> for LogicalTimestamp {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::utc("1970-01-01T00:00:00.010Z", 10)]
    #[case::offset("1970-01-01T01:00:00.000+01:00", 0)]
    #[case::no_offset("1970-01-01T00:00:01", 1_000)]
    #[case::no_offset_millis("1970-01-01T00:00:00.250", 250)]
    #[case::date_only("1970-01-02", 86_400_000)]
    #[case::garbage("not a date", 0)]
    #[case::empty("", 0)]
    fn sort_key_parses_or_falls_back_to_zero(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(LogicalTimestamp::new(raw).sort_key(), expected);
    }

    #[rstest]
    fn missing_timestamp_sorts_as_zero() {
        assert_eq!(LogicalTimestamp::missing().sort_key(), 0);
        assert!(LogicalTimestamp::missing().instant().is_none());
    }

    #[rstest]
    fn null_deserialises_as_missing() {
        let parsed: LogicalTimestamp =
            serde_json::from_value(serde_json::Value::Null).expect("null timestamp");
        assert_eq!(parsed, LogicalTimestamp::missing());
    }
}
