//! Fetch coordination for month buckets
//!
//! Bridges the month cache and the backing store. The central correctness
//! property: for a given month-key there is at most one outstanding backend
//! request at a time. Concurrent callers - a foreground load plus a
//! scroll-triggered prefetch, say - attach to the same in-flight handle
//! instead of issuing duplicates.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use tempora_domain::{MonthKey, Result};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::MonthCache;
use crate::ports::{ItemStore, MembershipDirectory};

/// Handle shared by every caller awaiting the same month fetch. The error
/// type is `Clone`, so all of them observe the one outcome.
type SharedFetch = Shared<BoxFuture<'static, Result<()>>>;

/// Coordinates backend fetches into the month cache.
///
/// Clones share the cache and the in-flight map; the coordinator is handed
/// around by value the way the cache handle is.
#[derive(Clone)]
pub struct FetchCoordinator {
    store: Arc<dyn ItemStore>,
    memberships: Arc<dyn MembershipDirectory>,
    cache: MonthCache,
    user_id: Uuid,
    in_flight: Arc<Mutex<HashMap<MonthKey, SharedFetch>>>,
}

impl FetchCoordinator {
    /// Create a coordinator for one authenticated session.
    pub fn new(
        store: Arc<dyn ItemStore>,
        memberships: Arc<dyn MembershipDirectory>,
        cache: MonthCache,
        user_id: Uuid,
    ) -> Self {
        Self { store, memberships, cache, user_id, in_flight: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Make sure the bucket for `key` is present, fetching it if needed.
    ///
    /// Cached months return immediately with no backend call. A month with a
    /// fetch already in flight awaits that same fetch. On failure the bucket
    /// is left absent so a later call can retry; no retry loop is built in
    /// here - the caller decides.
    pub async fn ensure_month(&self, key: MonthKey) -> Result<()> {
        if self.cache.has(key) {
            return Ok(());
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock();
            if let Some(pending) = in_flight.get(&key) {
                debug!(month = %key, "joining in-flight month fetch");
                pending.clone()
            } else {
                let fetch = Self::load_month(self.clone(), key).boxed().shared();
                in_flight.insert(key, fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// Best-effort warm-up of the months on either side of `key`.
    ///
    /// Fire-and-forget: never awaited by callers, and failures are logged
    /// rather than propagated - adjacent-month prefetch is an optimization,
    /// not a correctness requirement.
    pub fn prefetch_adjacent(&self, key: MonthKey) {
        for neighbor in [key.prev(), key.next()] {
            if self.cache.has(neighbor) || self.in_flight.lock().contains_key(&neighbor) {
                continue;
            }

            let coordinator = self.clone();
            tokio::spawn(async move {
                if let Err(error) = coordinator.ensure_month(neighbor).await {
                    warn!(month = %neighbor, %error, "adjacent month prefetch failed");
                }
            });
        }
    }

    /// Drop all in-flight handles. Used on session reset; fetches already
    /// running are allowed to finish and land in the wiped cache.
    pub fn reset(&self) {
        self.in_flight.lock().clear();
    }

    /// The cache this coordinator populates.
    pub fn cache(&self) -> &MonthCache {
        &self.cache
    }

    /// One full fetch cycle for a month. Removes its in-flight marker in
    /// every outcome so the key can be fetched again later.
    async fn load_month(coordinator: Self, key: MonthKey) -> Result<()> {
        let outcome = coordinator.query_and_fill(key).await;

        coordinator.in_flight.lock().remove(&key);

        if let Err(ref error) = outcome {
            warn!(month = %key, %error, "month fetch failed; bucket left absent");
        }
        outcome
    }

    async fn query_and_fill(&self, key: MonthKey) -> Result<()> {
        let calendar_ids = match self.memberships.authorized_calendars(self.user_id).await {
            Ok(ids) => ids,
            Err(error) => {
                // The membership list not being known yet is a normal state
                // during initial load, not a fetch failure. The bucket stays
                // absent so the month is retried once the list resolves.
                debug!(month = %key, %error, "authorized calendar list unavailable");
                return Ok(());
            }
        };

        if calendar_ids.is_empty() {
            debug!(month = %key, "no authorized calendars; caching empty bucket");
            self.cache.set(key, Vec::new());
            return Ok(());
        }

        let items = self.store.query_items(&calendar_ids, key.date_range()).await?;
        debug!(month = %key, count = items.len(), "month bucket loaded");
        self.cache.set(key, items);
        Ok(())
    }
}
