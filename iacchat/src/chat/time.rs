use std::fmt::Display;

use chrono::{DateTime, Duration, Months, TimeZone, Utc};

/// Label for a timestamp relative to `now`, bucketed by recency:
/// time of day within 24 hours, weekday within 7 days, month and day
/// within 6 calendar months, month, day and year beyond that.
pub fn format_relative<Tz>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let gap = now.clone().signed_duration_since(timestamp.clone());

    if gap < Duration::hours(24) {
        timestamp.format("%-I:%M %p").to_string()
    } else if gap < Duration::days(7) {
        timestamp.format("%a").to_string()
    } else if within_half_year(timestamp, now) {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d %Y").to_string()
    }
}

fn within_half_year<Tz: TimeZone>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
    match now.clone().checked_sub_months(Months::new(6)) {
        Some(cutoff) => *timestamp > cutoff,
        None => false,
    }
}

/// [`format_relative`] for a store timestamp in epoch milliseconds.
/// Out-of-range values yield an empty label.
pub fn format_millis<Tz>(millis: i64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match Utc.timestamp_millis_opt(millis).single() {
        Some(ts) => format_relative(&ts.with_timezone(&now.timezone()), now),
        None => String::new(),
    }
}
