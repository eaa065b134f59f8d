//! Calendar grid generation
//!
//! Pure computation: given an anchor date, produce the month's full calendar
//! grid - every week that touches the month, Monday-aligned, including
//! padding days from adjacent months. No I/O, no state.
//!
//! `today` is an explicit parameter everywhere: `is_today` is a snapshot
//! taken at generation time, and callers needing a fresh value regenerate
//! the month.

use chrono::{Datelike, Days, NaiveDate};
use tempora_domain::{CalendarDay, CalendarMonth, CalendarWeek, MonthKey};

/// Header row labels. Weeks always start on Monday; this is a fixed policy,
/// not locale-sensitive.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The Monday on or before `date`.
fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday on or after `date`.
fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    date + Days::new(u64::from(6 - date.weekday().num_days_from_monday()))
}

fn build_day(date: NaiveDate, anchor: MonthKey, today: NaiveDate) -> CalendarDay {
    CalendarDay {
        date,
        day_number: date.day(),
        weekday_label: date.format("%A").to_string(),
        weekday_index: date.weekday().num_days_from_monday() as u8,
        in_month_label: date.format("%b").to_string(),
        is_current_month: MonthKey::from_date(date) == anchor,
        is_today: date == today,
    }
}

/// Partition the grid days into 7-day weeks in document order.
///
/// A week's month attribution comes from its first day that belongs to the
/// anchor month; a week with no such day (cannot occur in a grid produced by
/// [`generate_month`], kept as a fallback) is attributed to `grid_start + 6`.
fn build_weeks(days: &[CalendarDay], grid_start: NaiveDate) -> Vec<CalendarWeek> {
    days.chunks_exact(7)
        .map(|chunk| {
            let start = chunk[0].date;
            let owner = chunk
                .iter()
                .find(|day| day.is_current_month)
                .map_or(grid_start + Days::new(6), |day| day.date);

            CalendarWeek {
                start,
                end: chunk[6].date,
                week_number: start.iso_week().week(),
                year: start.year(),
                month_key: owner.format("%Y-%m").to_string(),
                month_label: owner.format("%B").to_string(),
                days: chunk.to_vec(),
            }
        })
        .collect()
}

/// Generate the full grid for the month containing `anchor`.
///
/// Deterministic and always succeeds for any valid calendar date. The grid
/// spans from the Monday on/before the 1st to the Sunday on/after the last
/// day, so up to 6 days of each neighboring month appear with
/// `is_current_month == false`.
pub fn generate_month(anchor: NaiveDate, today: NaiveDate) -> CalendarMonth {
    let key = MonthKey::from_date(anchor);
    let month_start = key.first_day();
    let month_end = key.last_day();

    let grid_start = monday_on_or_before(month_start);
    let grid_end = sunday_on_or_after(month_end);

    let mut days = Vec::new();
    let mut cursor = grid_start;
    while cursor <= grid_end {
        days.push(build_day(cursor, key, today));
        cursor = cursor + Days::new(1);
    }

    let weeks = build_weeks(&days, grid_start);

    CalendarMonth {
        id: month_start.format("%Y-%m").to_string(),
        date: month_start,
        name: month_start.format("%B %Y").to_string(),
        month_number: key.month0,
        year: key.year,
        days,
        weeks,
    }
}

/// Convenience wrapper for generating a month directly from its cache key.
pub fn generate_month_for_key(key: MonthKey, today: NaiveDate) -> CalendarMonth {
    generate_month(key.first_day(), today)
}

/// The standalone Monday-aligned week containing `today`, used by the weekly
/// view's current-week strip.
pub fn this_week(today: NaiveDate) -> CalendarWeek {
    let key = MonthKey::from_date(today);
    let start = monday_on_or_before(today);

    let days = (0..7)
        .map(|offset| build_day(start + Days::new(offset), key, today))
        .collect();

    CalendarWeek {
        start,
        end: start + Days::new(6),
        week_number: start.iso_week().week(),
        year: start.year(),
        month_key: today.format("%Y-%m").to_string(),
        month_label: today.format("%B").to_string(),
        days,
    }
}
