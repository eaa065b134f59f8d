//! Shared test helpers for `tempora-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight in-memory mocks
//! over the backing-store ports so the scenario tests can focus on engine
//! behaviour instead of boilerplate.

// Each test binary compiles this module independently and uses a subset.
#![allow(dead_code)]

pub mod store;

use chrono::{NaiveDate, NaiveTime};
use tempora_domain::{ItemStatus, NewScheduleItem, ScheduleItem};
use uuid::Uuid;

/// Install a test subscriber so `RUST_LOG`-filtered engine traces show up in
/// failing test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).unwrap()
}

/// A stored row on the given calendar and day.
pub fn item_on(calendar_id: Uuid, day: NaiveDate, title: &str) -> ScheduleItem {
    ScheduleItem {
        id: Uuid::new_v4(),
        calendar_id,
        created_by: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        location: None,
        date: Some(day),
        scheduled_at: None,
        status: ItemStatus::Pending,
        created_at: None,
        updated_at: None,
    }
}

/// A create/update payload on the given calendar and day.
pub fn draft_on(calendar_id: Uuid, day: Option<NaiveDate>, title: &str) -> NewScheduleItem {
    NewScheduleItem {
        calendar_id,
        created_by: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        location: None,
        date: day,
        scheduled_at: None,
    }
}
