//! Wall-clock seam and timestamp text helpers.
//!
//! # Responsibility
//! - Provide the "current time" used by every past/future classification.
//! - Own the fixed timestamp text format shared by persistence and callers.
//!
//! # Invariants
//! - Timestamps are local wall-clock values with second precision.
//! - A meeting is "future" iff its date is strictly after `Clock::now()`.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Persisted/entered timestamp format, e.g. `2013/09/01 14:30:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
/// Calendar-day format used by day-based queries, e.g. `2013/09/01`.
pub const DAY_FORMAT: &str = "%Y/%m/%d";

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system clock, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Formats a timestamp using [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp in [`TIMESTAMP_FORMAT`]. Surrounding whitespace is ignored.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parses a calendar day in [`DAY_FORMAT`].
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DAY_FORMAT).ok()
}
