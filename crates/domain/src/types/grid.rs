//! Calendar grid types
//!
//! Structural day/week/month types produced by the grid generator. These
//! carry no item data; dated items live in the month cache and are merged
//! with the grid by the UI layer.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Partition key for the month cache.
///
/// `month0` is zero-indexed (January = 0), matching the wire format
/// `"{year}-{month0}"` used as the bucket key. Construction normalizes
/// out-of-range months into the year component, so `prev()`/`next()` can walk
/// across year boundaries freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month0: u32,
}

impl MonthKey {
    /// Create a key from a year and zero-indexed month, normalizing month
    /// overflow/underflow into the year.
    pub fn new(year: i32, month0: i32) -> Self {
        let total = i64::from(year) * 12 + i64::from(month0);
        let norm_year = total.div_euclid(12);
        let norm_month = total.rem_euclid(12);
        Self { year: norm_year as i32, month0: norm_month as u32 }
    }

    /// Key of the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month0: date.month0() }
    }

    /// The month immediately before this one.
    pub fn prev(self) -> Self {
        Self::new(self.year, self.month0 as i32 - 1)
    }

    /// The month immediately after this one.
    pub fn next(self) -> Self {
        Self::new(self.year, self.month0 as i32 + 1)
    }

    /// First calendar day of the month.
    pub fn first_day(self) -> NaiveDate {
        // month0 is normalized to 0..12 by construction
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn last_day(self) -> NaiveDate {
        self.next().first_day() - Days::new(1)
    }

    /// Inclusive date range spanning the month, as handed to the backing
    /// store when loading the bucket.
    pub fn date_range(self) -> DateRange {
        DateRange { start: self.first_day(), end: self.last_day() }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month0)
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether `date` falls within the range (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A single day cell in the calendar grid.
///
/// Derived and immutable; recomputed whenever the owning month is generated.
/// `is_today` is a snapshot taken at generation time; regenerating a month
/// later may flip it, and callers needing a fresh "today" must regenerate.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_number: u32,
    /// Full weekday name, e.g. "Monday".
    pub weekday_label: String,
    /// Monday = 0 .. Sunday = 6.
    pub weekday_index: u8,
    /// Short month name, e.g. "Jun".
    pub in_month_label: String,
    pub is_current_month: bool,
    pub is_today: bool,
}

// Equality is by date; the remaining fields are derived from it plus the
// generation context.
impl PartialEq for CalendarDay {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

/// A Monday-aligned week of exactly seven contiguous days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    /// The Monday on/before the first day of the week.
    pub start: NaiveDate,
    /// `start + 6` days.
    pub end: NaiveDate,
    /// ISO week number of `start`.
    pub week_number: u32,
    pub year: i32,
    /// `"YYYY-MM"` id of the month this week is attributed to.
    pub month_key: String,
    /// Full month name, e.g. "June".
    pub month_label: String,
    pub days: Vec<CalendarDay>,
}

/// A month's full calendar grid: every week that touches the month,
/// including padding days pulled in from adjacent months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    /// `"YYYY-MM"`.
    pub id: String,
    /// First calendar day of the month.
    pub date: NaiveDate,
    /// Display name, e.g. "June 2025".
    pub name: String,
    /// Zero-indexed month, 0..11.
    pub month_number: u32,
    pub year: i32,
    /// All grid days; length is always a multiple of 7.
    pub days: Vec<CalendarDay>,
    /// 7-day partitions of `days`, in document order.
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarMonth {
    /// Cache partition key for this month.
    pub fn key(&self) -> MonthKey {
        MonthKey { year: self.year, month0: self.month_number }
    }
}
