//! Engine configuration types and builder
//!
//! Tunables for the viewport state machine and the cache's bounded
//! eviction, defaulting to the domain constants. Constructed once per
//! session; tests override individual knobs through the builder.

use std::time::Duration;

use tempora_domain::constants::{
    DEFAULT_MAX_CACHED_MONTHS, EDGE_COOLDOWN_MS, EDGE_THRESHOLD_PX, EXPANSION_BATCH_MONTHS,
    FOCUSED_MONTH_PROBE_PX, INITIAL_MONTH_RADIUS, INITIAL_SETTLE_MS, PROGRAMMATIC_SCROLL_MS,
};

/// Configuration for a [`crate::engine::CalendarEngine`] session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Distance from a scroll edge (px) below which expansion triggers.
    pub edge_threshold_px: f64,

    /// Minimum delay between two expansions in the same direction.
    pub edge_cooldown: Duration,

    /// Delay after the initial anchor scroll before scroll events are
    /// treated as user input.
    pub settle_delay: Duration,

    /// How long scroll events are suppressed after a programmatic scroll
    /// starts.
    pub programmatic_scroll_window: Duration,

    /// Offset below the viewport top used to pick the focused month.
    pub focused_month_probe_px: f64,

    /// Months rendered on each side of the anchor at initialization.
    pub initial_month_radius: u32,

    /// Months added per edge-triggered expansion.
    pub expansion_batch: u32,

    /// Bounded-eviction cap on cached month buckets (None = unbounded).
    pub max_cached_months: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_threshold_px: EDGE_THRESHOLD_PX,
            edge_cooldown: Duration::from_millis(EDGE_COOLDOWN_MS),
            settle_delay: Duration::from_millis(INITIAL_SETTLE_MS),
            programmatic_scroll_window: Duration::from_millis(PROGRAMMATIC_SCROLL_MS),
            focused_month_probe_px: FOCUSED_MONTH_PROBE_PX,
            initial_month_radius: INITIAL_MONTH_RADIUS,
            expansion_batch: EXPANSION_BATCH_MONTHS,
            max_cached_months: Some(DEFAULT_MAX_CACHED_MONTHS),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig with fluent API
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edge-detection threshold in pixels
    pub fn edge_threshold_px(mut self, px: f64) -> Self {
        self.config.edge_threshold_px = px;
        self
    }

    /// Set the same-direction expansion cooldown
    pub fn edge_cooldown(mut self, cooldown: Duration) -> Self {
        self.config.edge_cooldown = cooldown;
        self
    }

    /// Set the initial settle delay
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set the programmatic-scroll suppression window
    pub fn programmatic_scroll_window(mut self, window: Duration) -> Self {
        self.config.programmatic_scroll_window = window;
        self
    }

    /// Set the focused-month probe offset in pixels
    pub fn focused_month_probe_px(mut self, px: f64) -> Self {
        self.config.focused_month_probe_px = px;
        self
    }

    /// Set how many months render on each side of the anchor
    pub fn initial_month_radius(mut self, radius: u32) -> Self {
        self.config.initial_month_radius = radius;
        self
    }

    /// Set the per-expansion month batch size
    pub fn expansion_batch(mut self, batch: u32) -> Self {
        self.config.expansion_batch = batch;
        self
    }

    /// Cap the number of cached month buckets (None = unbounded)
    pub fn max_cached_months(mut self, cap: Option<usize>) -> Self {
        self.config.max_cached_months = cap;
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
