//! Viewport control for the infinite-scroll month list
//!
//! Owns the ordered list of rendered months and the state machine that
//! keeps it stable while the user scrolls: an initial anchor with a settle
//! delay (so the first layout paint is not mistaken for a user scroll),
//! edge detection with per-direction cooldowns, a suppression window during
//! programmatic scrolls, and explicit expansion toward navigated dates.
//!
//! The controller never touches the DOM; the UI layer reports scroll
//! geometry in and receives scroll targets back.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tempora_common::time::Clock;
use tempora_domain::{CalendarMonth, MonthKey, Result};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::fetch::FetchCoordinator;
use crate::grid;

/// Lifecycle of the rendered viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportPhase {
    Uninitialized,
    /// Initial window built, waiting out the settle delay.
    LoadingInitial,
    Ready,
}

/// Which scroll edge triggered an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Top,
    Bottom,
}

/// Scroll geometry reported by the UI layer on each scroll event.
#[derive(Debug, Clone, Copy)]
pub struct ScrollMetrics {
    pub distance_from_top: f64,
    pub distance_from_bottom: f64,
}

/// Rendered bounds of one month section, relative to the scroll container.
#[derive(Debug, Clone, Copy)]
pub struct SectionBounds {
    pub key: MonthKey,
    pub top: f64,
    pub bottom: f64,
}

/// Where the UI should scroll after initialization or navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub month: MonthKey,
    pub date: NaiveDate,
    /// False for the instant initial jump, true for animated navigation.
    pub animated: bool,
}

/// Drives the rendered month list for one session.
pub struct ViewportController {
    fetch: FetchCoordinator,
    clock: Arc<dyn Clock>,
    config: EngineConfig,

    phase: ViewportPhase,
    months: Vec<CalendarMonth>,
    anchor_date: Option<NaiveDate>,
    focused: Option<MonthKey>,

    ready_at: Option<Instant>,
    programmatic_until: Option<Instant>,
    cooldown_top_until: Option<Instant>,
    cooldown_bottom_until: Option<Instant>,
}

impl ViewportController {
    /// Create an uninitialized controller.
    pub fn new(fetch: FetchCoordinator, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            fetch,
            clock,
            config,
            phase: ViewportPhase::Uninitialized,
            months: Vec::new(),
            anchor_date: None,
            focused: None,
            ready_at: None,
            programmatic_until: None,
            cooldown_top_until: None,
            cooldown_bottom_until: None,
        }
    }

    /// Current phase, accounting for an elapsed settle delay.
    pub fn phase(&mut self) -> ViewportPhase {
        self.refresh_phase();
        self.phase
    }

    /// The rendered months, in order.
    pub fn months(&self) -> &[CalendarMonth] {
        &self.months
    }

    /// The month driving the "Month Year" indicator.
    pub fn focused_month(&self) -> Option<MonthKey> {
        self.focused
    }

    /// Display label for the focused month, e.g. "June 2025".
    pub fn month_label(&self) -> Option<String> {
        self.focused.map(|key| key.first_day().format("%B %Y").to_string())
    }

    /// Build the initial window around `anchor` (today when `None`), load
    /// its buckets, and return the instant scroll target.
    ///
    /// The anchor month loads in the foreground and its failure propagates;
    /// the surrounding window is best-effort so a flaky backend cannot block
    /// first paint. Scroll events are ignored until the settle delay after
    /// this call elapses.
    pub async fn initialize(&mut self, anchor: Option<NaiveDate>) -> Result<ScrollTarget> {
        let today = self.clock.today();
        let anchor_date = anchor.unwrap_or(today);
        let anchor_key = MonthKey::from_date(anchor_date);

        if self.phase != ViewportPhase::Uninitialized {
            warn!("viewport already initialized");
            return Ok(ScrollTarget {
                month: self.focused.unwrap_or(anchor_key),
                date: self.anchor_date.unwrap_or(anchor_date),
                animated: false,
            });
        }

        self.phase = ViewportPhase::LoadingInitial;
        self.anchor_date = Some(anchor_date);
        self.focused = Some(anchor_key);

        let radius = self.config.initial_month_radius as i32;
        self.months = (-radius..=radius)
            .map(|offset| {
                let key = MonthKey::new(anchor_key.year, anchor_key.month0 as i32 + offset);
                grid::generate_month_for_key(key, today)
            })
            .collect();

        self.fetch.ensure_month(anchor_key).await?;
        for month in &self.months {
            let key = month.key();
            if key == anchor_key {
                continue;
            }
            if let Err(error) = self.fetch.ensure_month(key).await {
                warn!(month = %key, %error, "initial window month failed to load");
            }
        }
        self.fetch.prefetch_adjacent(anchor_key);

        self.ready_at = Some(self.clock.now() + self.config.settle_delay);
        debug!(anchor = %anchor_key, months = self.months.len(), "viewport initialized");

        Ok(ScrollTarget { month: anchor_key, date: anchor_date, animated: false })
    }

    /// Process a scroll event: detect proximity to either edge and expand
    /// in that direction. Returns the edge that triggered, if any.
    ///
    /// Events are ignored before the viewport is ready and while a
    /// programmatic scroll is in progress, so neither the initial anchor
    /// jump nor animated navigation can feed back into expansion.
    pub async fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<EdgeDirection> {
        self.refresh_phase();
        if self.phase != ViewportPhase::Ready || self.in_programmatic_scroll() {
            return None;
        }

        if metrics.distance_from_top < self.config.edge_threshold_px
            && !self.cooldown_active(EdgeDirection::Top)
        {
            self.on_near_top().await;
            return Some(EdgeDirection::Top);
        }

        if metrics.distance_from_bottom < self.config.edge_threshold_px
            && !self.cooldown_active(EdgeDirection::Bottom)
        {
            self.on_near_bottom().await;
            return Some(EdgeDirection::Bottom);
        }

        None
    }

    /// Expand the rendered list upward by one batch. Returns the keys of
    /// the months added (empty while the direction is cooling down).
    pub async fn on_near_top(&mut self) -> Vec<MonthKey> {
        self.expand(EdgeDirection::Top).await
    }

    /// Expand the rendered list downward by one batch. Returns the keys of
    /// the months added (empty while the direction is cooling down).
    pub async fn on_near_bottom(&mut self) -> Vec<MonthKey> {
        self.expand(EdgeDirection::Bottom).await
    }

    /// Navigate to a specific date, expanding the rendered range toward it
    /// first when it is not yet rendered. Opens the programmatic-scroll
    /// window so the resulting animation does not re-trigger edge logic.
    pub async fn go_to_date(&mut self, date: NaiveDate) -> Result<ScrollTarget> {
        if self.phase == ViewportPhase::Uninitialized {
            return self.initialize(Some(date)).await;
        }

        let today = self.clock.today();
        let target = MonthKey::from_date(date);

        // Structural expansion only; intermediate months load lazily via
        // edge detection when the user actually scrolls past them.
        while self.first_key().is_some_and(|first| target < first) {
            let key = self.first_key().map_or(target, MonthKey::prev);
            self.months.insert(0, grid::generate_month_for_key(key, today));
        }
        while self.last_key().is_some_and(|last| last < target) {
            let key = self.last_key().map_or(target, MonthKey::next);
            self.months.push(grid::generate_month_for_key(key, today));
        }

        self.fetch.ensure_month(target).await?;
        self.fetch.prefetch_adjacent(target);

        self.focused = Some(target);
        self.begin_programmatic_scroll();

        Ok(ScrollTarget { month: target, date, animated: true })
    }

    /// Navigate back to today's month.
    pub async fn scroll_to_today(&mut self) -> Result<ScrollTarget> {
        let today = self.clock.today();
        self.go_to_date(today).await
    }

    /// Step the focused month backward.
    pub async fn go_to_previous_month(&mut self) -> Result<ScrollTarget> {
        let current = self.current_key();
        self.go_to_date(current.prev().first_day()).await
    }

    /// Step the focused month forward.
    pub async fn go_to_next_month(&mut self) -> Result<ScrollTarget> {
        let current = self.current_key();
        self.go_to_date(current.next().first_day()).await
    }

    /// Recompute the focused month from rendered section geometry: the
    /// first section whose bottom edge clears the viewport top by the probe
    /// offset. Not necessarily the topmost visible section.
    pub fn update_focused_month(
        &mut self,
        sections: &[SectionBounds],
        viewport_top: f64,
    ) -> Option<MonthKey> {
        let probe = viewport_top + self.config.focused_month_probe_px;
        let hit = sections.iter().find(|section| section.bottom > probe).map(|section| section.key);

        if let Some(key) = hit {
            self.focused = Some(key);
        }
        hit
    }

    /// Open the suppression window for an animated scroll started by
    /// navigation buttons or keyboard.
    pub fn begin_programmatic_scroll(&mut self) {
        self.programmatic_until = Some(self.clock.now() + self.config.programmatic_scroll_window);
    }

    /// Close the suppression window early, e.g. when the UI observes the
    /// animation finishing.
    pub fn finish_programmatic_scroll(&mut self) {
        self.programmatic_until = None;
    }

    /// Drop all rendered state back to `Uninitialized`. Used on sign-out.
    pub fn reset(&mut self) {
        self.phase = ViewportPhase::Uninitialized;
        self.months.clear();
        self.anchor_date = None;
        self.focused = None;
        self.ready_at = None;
        self.programmatic_until = None;
        self.cooldown_top_until = None;
        self.cooldown_bottom_until = None;
    }

    fn refresh_phase(&mut self) {
        if self.phase == ViewportPhase::LoadingInitial {
            if let Some(ready_at) = self.ready_at {
                if self.clock.now() >= ready_at {
                    self.phase = ViewportPhase::Ready;
                }
            }
        }
    }

    fn in_programmatic_scroll(&self) -> bool {
        self.programmatic_until.is_some_and(|until| self.clock.now() < until)
    }

    fn cooldown_active(&self, direction: EdgeDirection) -> bool {
        let until = match direction {
            EdgeDirection::Top => self.cooldown_top_until,
            EdgeDirection::Bottom => self.cooldown_bottom_until,
        };
        until.is_some_and(|until| self.clock.now() < until)
    }

    fn start_cooldown(&mut self, direction: EdgeDirection) {
        let until = Some(self.clock.now() + self.config.edge_cooldown);
        match direction {
            EdgeDirection::Top => self.cooldown_top_until = until,
            EdgeDirection::Bottom => self.cooldown_bottom_until = until,
        }
    }

    /// One batch of expansion toward `direction`. The cooldown starts at
    /// the trigger, and the structural months are spliced in before any
    /// fetching, so a failing backend still yields scrollable (empty,
    /// retryable) months.
    async fn expand(&mut self, direction: EdgeDirection) -> Vec<MonthKey> {
        if self.months.is_empty() || self.cooldown_active(direction) {
            return Vec::new();
        }
        self.start_cooldown(direction);

        let today = self.clock.today();
        let batch = self.config.expansion_batch as i32;

        let added: Vec<MonthKey> = match direction {
            EdgeDirection::Top => {
                let Some(first) = self.first_key() else { return Vec::new() };
                let keys: Vec<MonthKey> = (1..=batch)
                    .rev()
                    .map(|step| MonthKey::new(first.year, first.month0 as i32 - step))
                    .collect();
                for (index, key) in keys.iter().enumerate() {
                    self.months.insert(index, grid::generate_month_for_key(*key, today));
                }
                keys
            }
            EdgeDirection::Bottom => {
                let Some(last) = self.last_key() else { return Vec::new() };
                let keys: Vec<MonthKey> = (1..=batch)
                    .map(|step| MonthKey::new(last.year, last.month0 as i32 + step))
                    .collect();
                for key in &keys {
                    self.months.push(grid::generate_month_for_key(*key, today));
                }
                keys
            }
        };

        for key in &added {
            if let Err(error) = self.fetch.ensure_month(*key).await {
                warn!(month = %key, %error, "expansion month failed to load; rendering empty");
            }
            self.fetch.prefetch_adjacent(*key);
        }

        debug!(?direction, count = added.len(), "viewport expanded");
        added
    }

    fn first_key(&self) -> Option<MonthKey> {
        self.months.first().map(CalendarMonth::key)
    }

    fn last_key(&self) -> Option<MonthKey> {
        self.months.last().map(CalendarMonth::key)
    }

    fn current_key(&self) -> MonthKey {
        self.focused.unwrap_or_else(|| MonthKey::from_date(self.clock.today()))
    }
}
