//! Half-open per-day time windows and date input normalization.
//!
//! Every date-scoped query uses the same `[start, end)` interval: local
//! midnight of the day through local midnight of the next calendar day,
//! both converted to UTC. The facility's reference timezone is the process
//! local timezone; stored instants are always UTC.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::types::ValidationError;

/// The half-open `[start, end)` interval covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Whether an instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = local_date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            Local
                .from_local_datetime(&one_am)
                .unwrap()
                .with_timezone(&Utc)
        }
    }
}

/// Computes the window for `date`: local midnight through the next local
/// midnight. A record exactly at midnight belongs to `date`; one at the
/// instant of the next midnight does not.
#[must_use]
pub fn day_window(date: NaiveDate) -> DayWindow {
    let next = date + Duration::days(1);
    DayWindow {
        start: local_midnight_to_utc(date),
        end: local_midnight_to_utc(next),
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_day(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Normalizes a date-or-timestamp argument to a single instant.
///
/// A calendar date maps to that day's local-midnight instant; an RFC 3339
/// timestamp passes through unchanged. Applied uniformly before any
/// comparison so call sites never branch on the input shape.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day_window(date).start);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp {
            value: value.to_string(),
        })
}
