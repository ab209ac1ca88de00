//! Recency filter: is a posting date inside the retention window?

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::warn;

/// Parses the leading `YYYY-MM-DD` of a date string. Anything after the tenth
/// character (a time part, a zone) is ignored.
pub fn parse_posting_date(date: &str) -> Option<NaiveDate> {
    let head = date
        .char_indices()
        .nth(10)
        .map_or(date, |(idx, _)| &date[..idx]);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// `true` iff the posting is strictly younger than `days_threshold` days, measured
/// from midnight of the posting date to now (UTC).
pub fn is_recent(date: &str, days_threshold: u32) -> bool {
    is_recent_at(date, days_threshold, Utc::now().naive_utc())
}

/// `is_recent` against an explicit clock. Unparseable dates are never recent.
pub fn is_recent_at(date: &str, days_threshold: u32, now: NaiveDateTime) -> bool {
    let Some(posted) = parse_posting_date(date) else {
        warn!(date = %date, "Could not parse posting date, treating as not recent");
        return false;
    };
    now - posted.and_time(NaiveTime::MIN) < Duration::days(i64::from(days_threshold))
}
