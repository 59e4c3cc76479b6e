//! Short relative age labels ("now", "5m", "3h", or a calendar date).

use chrono::{DateTime, Utc};

use super::timestamp::LogicalTimestamp;

/// Describe how long ago `timestamp` was, relative to `now`.
///
/// Missing, unparseable, and future timestamps read as `"now"`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use feed::domain::{relative_age, LogicalTimestamp};
///
/// let now = Utc.with_ymd_and_hms(2025, 8, 21, 12, 0, 0).unwrap();
/// let posted = LogicalTimestamp::new("2025-08-21T11:15:00Z");
/// assert_eq!(relative_age(&posted, now), "45m");
/// ```
#[must_use]
pub fn relative_age(timestamp: &LogicalTimestamp, now: DateTime<Utc>) -> String {
    let Some(instant) = timestamp.instant() else {
        return "now".to_owned();
    };
    let elapsed = now.signed_duration_since(instant);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 1 {
        "now".to_owned()
    } else if minutes < 60 {
        format!("{minutes}m")
    } else if hours < 24 {
        format!("{hours}h")
    } else {
        instant.format("%Y-%m-%d").to_string()
    }
}
