//! Calendar Date Handling
//!
//! Date keys (`YYYY-MM-DD`), expansion of a start date plus a day count
//! into an ordered date list, and the per-day timestamp windows used to
//! query the upstream OMS search endpoint.
//!
//! Dates are timezone-naive and interpreted in the process's local
//! calendar: a day's window runs from local midnight to the next local
//! midnight minus one second, expressed in unix seconds.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate, NaiveTime, TimeZone};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Errors for malformed calendar-date input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    /// Input was not a valid `YYYY-MM-DD` date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

// =============================================================================
// DateKey
// =============================================================================

/// A calendar date in `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Yesterday in the process's local calendar.
    #[must_use]
    pub fn yesterday() -> Self {
        let today = Local::now().date_naive();
        Self(today.checked_sub_days(Days::new(1)).unwrap_or(today))
    }

    /// The next calendar day, if representable.
    #[must_use]
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateError::InvalidDate(s.to_string()))
    }
}

// =============================================================================
// Range Expansion
// =============================================================================

/// Expand a start date and day count into `days` consecutive dates,
/// ascending and inclusive of the start.
///
/// No upper bound is enforced on `days`; callers are responsible for not
/// requesting unreasonable ranges.
#[must_use]
pub fn expand(start: DateKey, days: u32) -> Vec<DateKey> {
    let mut dates = Vec::with_capacity(days as usize);
    let mut current = start;
    for _ in 0..days {
        dates.push(current);
        match current.succ() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

// =============================================================================
// Day Windows
// =============================================================================

/// The inclusive unix-second bounds of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayWindow {
    /// Local midnight at the start of the day, in unix seconds.
    pub start: i64,
    /// One second before the next local midnight, in unix seconds.
    pub end: i64,
}

impl DayWindow {
    /// Compute the fetch window for a date.
    #[must_use]
    pub fn of(date: DateKey) -> Self {
        let start = day_start_ts(date.date());
        let end = date
            .succ()
            .map_or(start + 86_399, |next| day_start_ts(next.date()) - 1);
        Self { start, end }
    }
}

/// Unix timestamp of local midnight for a date.
///
/// On days where local midnight does not exist (a DST gap), the earliest
/// valid local time is used; if the local mapping fails entirely the
/// naive timestamp is interpreted as UTC.
fn day_start_ts(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(|| midnight.and_utc().timestamp(), |dt| dt.timestamp())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn expand_returns_consecutive_dates() {
        let dates = expand(key("2025-07-10"), 3);
        assert_eq!(
            dates,
            vec![key("2025-07-10"), key("2025-07-11"), key("2025-07-12")]
        );
    }

    #[test]
    fn expand_single_day() {
        assert_eq!(expand(key("2025-01-31"), 1), vec![key("2025-01-31")]);
    }

    #[test]
    fn expand_crosses_month_and_year_boundaries() {
        let dates = expand(key("2024-12-30"), 4);
        assert_eq!(
            dates,
            vec![
                key("2024-12-30"),
                key("2024-12-31"),
                key("2025-01-01"),
                key("2025-01-02"),
            ]
        );
    }

    #[test]
    fn expand_length_matches_days() {
        for days in 1..=40 {
            assert_eq!(expand(key("2025-02-27"), days).len(), days as usize);
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!("not-a-date".parse::<DateKey>().is_err());
        assert!("2025-13-01".parse::<DateKey>().is_err());
        assert!("2025/07/10".parse::<DateKey>().is_err());
        assert_eq!(
            "garbage".parse::<DateKey>(),
            Err(DateError::InvalidDate("garbage".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        let date = key("2025-07-10");
        assert_eq!(date.to_string(), "2025-07-10");
        assert_eq!(date.to_string().parse::<DateKey>().unwrap(), date);
    }

    #[test]
    fn window_spans_one_day_inclusive() {
        // Mid-January and mid-July avoid DST transition days in any
        // plausible local timezone.
        for date in ["2025-01-15", "2025-07-10"] {
            let window = DayWindow::of(key(date));
            assert_eq!(window.end - window.start, 86_399, "date {date}");
        }
    }

    #[test]
    fn windows_of_adjacent_days_are_contiguous() {
        let first = DayWindow::of(key("2025-07-10"));
        let second = DayWindow::of(key("2025-07-11"));
        assert_eq!(first.end + 1, second.start);
    }
}
