//! Time abstraction for testability
//!
//! Provides a trait-based approach to time operations that allows for
//! deterministic testing without relying on actual time passage. The engine
//! reads two things from a clock: a monotonic instant (cooldown and settle
//! timers) and the local wall-clock date (the `is_today` snapshot taken when
//! a month grid is generated).
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use chrono::NaiveDate;
//! use tempora_common::time::{Clock, MockClock, SystemClock};
//!
//! // Use system clock in production
//! let clock = SystemClock;
//! let _now = clock.now();
//!
//! // Use mock clock in tests
//! let mock = MockClock::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
//! let start = mock.now();
//! mock.advance(Duration::from_secs(5));
//! assert_eq!(mock.now().duration_since(start), Duration::from_secs(5));
//! ```

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    ///
    /// Returns a monotonic timestamp suitable for measuring durations.
    fn now(&self) -> Instant;

    /// Get the current wall-clock date in the local timezone
    fn today(&self) -> NaiveDate;
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Mock clock for deterministic testing
///
/// Starts at a fixed date; time only moves when [`MockClock::advance`] or
/// [`MockClock::set_today`] is called. Clones share state, so a clock handed
/// to the engine can still be driven from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug)]
struct MockState {
    elapsed: Duration,
    today: NaiveDate,
}

impl MockClock {
    /// Create a new mock clock pinned to the given wall-clock date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            start: Instant::now(),
            state: Arc::new(Mutex::new(MockState { elapsed: Duration::ZERO, today })),
        }
    }

    /// Advance the mock clock by a duration
    ///
    /// This simulates time passing without actually waiting. The wall-clock
    /// date is left unchanged; use [`MockClock::set_today`] to move it.
    pub fn advance(&self, duration: Duration) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut state = self.state.lock().expect("mutex poisoned");
        state.elapsed += duration;
    }

    /// Move the wall-clock date, e.g. to simulate midnight rolling over
    /// between two grid generations.
    pub fn set_today(&self, today: NaiveDate) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut state = self.state.lock().expect("mutex poisoned");
        state.today = today;
    }

    /// Get the simulated elapsed time since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        // Test utility: panic on poisoned mutex to fail tests early
        self.state.lock().expect("mutex poisoned").elapsed
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        // Test utility: panic on poisoned mutex to fail tests early
        self.start + self.state.lock().expect("mutex poisoned").elapsed
    }

    fn today(&self) -> NaiveDate {
        // Test utility: panic on poisoned mutex to fail tests early
        self.state.lock().expect("mutex poisoned").today
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time.
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Validates the system clock scenario.
    ///
    /// Assertions:
    /// - Ensures `now2 >= now1` evaluates to true.
    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let now1 = clock.now();
        let now2 = clock.now();

        assert!(now2 >= now1);
    }

    /// Validates `MockClock::new` behavior for the mock clock advance scenario.
    ///
    /// Assertions:
    /// - Confirms `after.duration_since(start)` equals
    ///   `Duration::from_secs(5)`.
    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new(date(2025, 6, 15));
        let start = clock.now();

        clock.advance(Duration::from_secs(5));
        let after = clock.now();

        assert_eq!(after.duration_since(start), Duration::from_secs(5));
    }

    /// Validates `MockClock::set_today` behavior for the wall-clock date
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `clock.today()` equals the pinned date.
    /// - Confirms `clock.today()` equals the updated date after `set_today`.
    #[test]
    fn test_mock_clock_set_today() {
        let clock = MockClock::new(date(2025, 6, 15));
        assert_eq!(clock.today(), date(2025, 6, 15));

        clock.set_today(date(2025, 6, 16));
        assert_eq!(clock.today(), date(2025, 6, 16));
    }

    /// Validates `MockClock::new` behavior for the mock clock clone scenario.
    ///
    /// Assertions:
    /// - Confirms `clock2.elapsed()` equals `Duration::from_secs(10)`.
    /// - Confirms `clock2.elapsed()` equals `Duration::from_secs(15)`.
    #[test]
    fn test_mock_clock_clone_shares_state() {
        let clock1 = MockClock::new(date(2025, 6, 15));
        clock1.advance(Duration::from_secs(10));

        let clock2 = clock1.clone();
        assert_eq!(clock2.elapsed(), Duration::from_secs(10));

        // Cloned clocks share the same elapsed time
        clock1.advance(Duration::from_secs(5));
        assert_eq!(clock2.elapsed(), Duration::from_secs(15));
    }
}
