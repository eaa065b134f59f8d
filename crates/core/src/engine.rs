//! Session-scoped engine facade
//!
//! [`CalendarEngine`] is the explicit context object owning the month
//! cache, fetch coordinator, mutation router, and viewport controller for
//! one authenticated session. It is constructed from the two backing-store
//! ports and disposed (or [`CalendarEngine::reset_all`]) on sign-out, so no
//! cached data can leak between users within the same process.

use std::sync::Arc;

use chrono::NaiveDate;
use tempora_common::time::{Clock, SystemClock};
use tempora_domain::{
    CalendarMonth, CalendarWeek, MonthKey, NewScheduleItem, Result, ScheduleItem,
};
use tokio::sync::{watch, Mutex};
use tracing::info;
use uuid::Uuid;

use crate::cache::MonthCache;
use crate::config::EngineConfig;
use crate::fetch::FetchCoordinator;
use crate::grid;
use crate::mutation::MutationRouter;
use crate::ports::{ItemStore, MembershipDirectory};
use crate::viewport::{
    EdgeDirection, ScrollMetrics, ScrollTarget, SectionBounds, ViewportController,
};

/// The calendar temporal engine for one authenticated session.
pub struct CalendarEngine {
    cache: MonthCache,
    fetch: FetchCoordinator,
    mutations: MutationRouter,
    viewport: Mutex<ViewportController>,
    clock: Arc<dyn Clock>,
}

impl CalendarEngine {
    /// Create an engine on the system clock.
    pub fn new(
        store: Arc<dyn ItemStore>,
        memberships: Arc<dyn MembershipDirectory>,
        user_id: Uuid,
        config: EngineConfig,
    ) -> Self {
        Self::with_clock(store, memberships, user_id, config, Arc::new(SystemClock))
    }

    /// Create an engine with a custom clock (useful for testing).
    pub fn with_clock(
        store: Arc<dyn ItemStore>,
        memberships: Arc<dyn MembershipDirectory>,
        user_id: Uuid,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = MonthCache::new(config.max_cached_months);
        let fetch = FetchCoordinator::new(store.clone(), memberships, cache.clone(), user_id);
        let mutations = MutationRouter::new(store, cache.clone());
        let viewport =
            Mutex::new(ViewportController::new(fetch.clone(), clock.clone(), config));

        Self { cache, fetch, mutations, viewport, clock }
    }

    // --- Grid -----------------------------------------------------------

    /// Generate the grid for the month containing `anchor`, with `is_today`
    /// snapshotted against the engine clock.
    pub fn generate_month(&self, anchor: NaiveDate) -> CalendarMonth {
        grid::generate_month(anchor, self.clock.today())
    }

    /// The current week strip for the weekly view.
    pub fn this_week(&self) -> CalendarWeek {
        grid::this_week(self.clock.today())
    }

    // --- Cache & fetch --------------------------------------------------

    /// Load the bucket for the month if it is not already cached or in
    /// flight. Errors surface to the caller; the bucket stays absent so the
    /// action can be retried.
    pub async fn ensure_month(&self, year: i32, month0: u32) -> Result<()> {
        self.fetch.ensure_month(MonthKey::new(year, month0 as i32)).await
    }

    /// Fire-and-forget warm-up of the months adjacent to the given one.
    pub fn prefetch_adjacent(&self, year: i32, month0: u32) {
        self.fetch.prefetch_adjacent(MonthKey::new(year, month0 as i32));
    }

    /// Cached items for the month, or `None` if it was never fetched.
    pub fn get_cached_month(&self, year: i32, month0: u32) -> Option<Vec<ScheduleItem>> {
        self.cache.get(MonthKey::new(year, month0 as i32))
    }

    /// Cached items falling on a specific day, ordered by scheduled time
    /// (untimed items first).
    pub fn items_for_date(&self, date: NaiveDate) -> Vec<ScheduleItem> {
        let mut items: Vec<ScheduleItem> = self
            .cache
            .get(MonthKey::from_date(date))
            .unwrap_or_default()
            .into_iter()
            .filter(|item| item.date == Some(date))
            .collect();
        items.sort_by_key(|item| item.scheduled_at);
        items
    }

    /// The unscheduled/backlog list.
    pub fn unscheduled_items(&self) -> Vec<ScheduleItem> {
        self.cache.unscheduled()
    }

    /// Subscribe to the cache revision counter bumped on every write.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.cache.subscribe()
    }

    // --- Mutations ------------------------------------------------------

    /// Create an item; the confirmed row is patched into the cache.
    pub async fn create_item(&self, draft: NewScheduleItem) -> Result<ScheduleItem> {
        self.mutations.create_item(draft).await
    }

    /// Update an item; `previous` is the pre-mutation row.
    pub async fn update_item(
        &self,
        id: Uuid,
        changes: NewScheduleItem,
        previous: &ScheduleItem,
    ) -> Result<ScheduleItem> {
        self.mutations.update_item(id, changes, previous).await
    }

    /// Delete an item.
    pub async fn delete_item(&self, item: &ScheduleItem) -> Result<()> {
        self.mutations.delete_item(item).await
    }

    // --- Viewport -------------------------------------------------------

    /// Build the initial rendered window and return the anchor target.
    pub async fn initialize(&self, anchor: Option<NaiveDate>) -> Result<ScrollTarget> {
        self.viewport.lock().await.initialize(anchor).await
    }

    /// Feed a scroll event into edge detection.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Option<EdgeDirection> {
        self.viewport.lock().await.on_scroll(metrics).await
    }

    /// Expand the rendered list upward by one batch.
    pub async fn on_near_top(&self) -> Vec<MonthKey> {
        self.viewport.lock().await.on_near_top().await
    }

    /// Expand the rendered list downward by one batch.
    pub async fn on_near_bottom(&self) -> Vec<MonthKey> {
        self.viewport.lock().await.on_near_bottom().await
    }

    /// Navigate to a date, expanding the rendered range toward it first.
    pub async fn go_to_date(&self, date: NaiveDate) -> Result<ScrollTarget> {
        self.viewport.lock().await.go_to_date(date).await
    }

    /// Navigate back to today.
    pub async fn go_to_today(&self) -> Result<ScrollTarget> {
        self.viewport.lock().await.scroll_to_today().await
    }

    /// Step the focused month backward.
    pub async fn go_to_previous_month(&self) -> Result<ScrollTarget> {
        self.viewport.lock().await.go_to_previous_month().await
    }

    /// Step the focused month forward.
    pub async fn go_to_next_month(&self) -> Result<ScrollTarget> {
        self.viewport.lock().await.go_to_next_month().await
    }

    /// Snapshot of the rendered months.
    pub async fn rendered_months(&self) -> Vec<CalendarMonth> {
        self.viewport.lock().await.months().to_vec()
    }

    /// Recompute the focused month from rendered section geometry.
    pub async fn update_focused_month(
        &self,
        sections: &[SectionBounds],
        viewport_top: f64,
    ) -> Option<MonthKey> {
        self.viewport.lock().await.update_focused_month(sections, viewport_top)
    }

    /// Display label for the focused month, e.g. "June 2025".
    pub async fn month_label(&self) -> Option<String> {
        self.viewport.lock().await.month_label()
    }

    /// Signal the end of an animated scroll so edge detection resumes.
    pub async fn finish_programmatic_scroll(&self) {
        self.viewport.lock().await.finish_programmatic_scroll();
    }

    // --- Session --------------------------------------------------------

    /// Wipe every bucket, the unscheduled list, the in-flight map, and the
    /// viewport. Used on sign-out; fetches already running are allowed to
    /// finish and land in the wiped cache.
    pub async fn reset_all(&self) {
        info!("resetting calendar engine state");
        self.cache.reset_all();
        self.fetch.reset();
        self.viewport.lock().await.reset();
    }
}
