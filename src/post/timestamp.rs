//! Relative timestamp labels

use chrono::{DateTime, Local, Utc};

/// Format `created_at` relative to `now`.
///
/// Buckets: under a minute is "just now", then whole minutes, hours and days
/// up to a week, and a calendar date beyond that. Timestamps in the future
/// (clock skew) read as "just now".
pub fn format_timestamp(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created_at);

    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        calendar_date(created_at)
    }
}

/// Calendar date in the local timezone, `M/D/YYYY`
pub fn calendar_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-m/%-d/%Y")
        .to_string()
}
