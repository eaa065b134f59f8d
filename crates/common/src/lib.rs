//! # Tempora Common
//!
//! Cross-cutting utilities shared across the Tempora crates.
//!
//! Currently this is the clock abstraction: production code reads monotonic
//! time (viewport cooldowns) and the wall-clock date (the grid's `is_today`
//! snapshot) through [`time::Clock`], so tests can substitute
//! [`time::MockClock`] and control both deterministically.

pub mod time;

pub use time::{Clock, MockClock, SystemClock};
