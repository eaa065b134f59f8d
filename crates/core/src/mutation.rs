//! Mutation routing for schedule items
//!
//! Routes create/update/delete through the backing store and patches the
//! month cache from the confirmed result. The cache is never patched
//! optimistically: if the store rejects a mutation, the error propagates
//! unchanged and the cache is untouched.

use std::sync::Arc;

use tempora_domain::{NewScheduleItem, Result, ScheduleItem};
use tracing::debug;
use uuid::Uuid;

use crate::cache::MonthCache;
use crate::ports::ItemStore;

/// Applies item mutations and keeps the month cache coherent.
#[derive(Clone)]
pub struct MutationRouter {
    store: Arc<dyn ItemStore>,
    cache: MonthCache,
}

impl MutationRouter {
    /// Create a router over the session's store and cache.
    pub fn new(store: Arc<dyn ItemStore>, cache: MonthCache) -> Self {
        Self { store, cache }
    }

    /// Create an item and patch it into its month bucket (or the
    /// unscheduled list). An uncached bucket is left absent; a later fetch
    /// for that month picks the item up from the backend.
    pub async fn create_item(&self, draft: NewScheduleItem) -> Result<ScheduleItem> {
        let item = self.store.insert_item(draft).await?;
        self.cache.patch_add(&item);
        debug!(item = %item.id, date = ?item.date, "item created");
        Ok(item)
    }

    /// Update an item. `previous` is the pre-mutation row; its date decides
    /// which bucket the item is detached from when the update moves it.
    pub async fn update_item(
        &self,
        id: Uuid,
        changes: NewScheduleItem,
        previous: &ScheduleItem,
    ) -> Result<ScheduleItem> {
        let item = self.store.update_item(id, changes).await?;
        self.cache.patch_update(&item, previous.date);
        debug!(item = %item.id, from = ?previous.date, to = ?item.date, "item updated");
        Ok(item)
    }

    /// Delete an item and drop it from its last known location. A no-op on
    /// the cache when that month was never fetched.
    pub async fn delete_item(&self, item: &ScheduleItem) -> Result<()> {
        self.store.delete_item(item.id).await?;
        self.cache.patch_remove(item.id, item.date);
        debug!(item = %item.id, "item deleted");
        Ok(())
    }
}
