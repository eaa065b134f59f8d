//! Month-partitioned item cache
//!
//! Buckets dated items by [`MonthKey`], holds unscheduled items in a
//! separate list, and tracks bucket recency for bounded LRU eviction.
//!
//! The cache is a shared handle: cloning shares storage, so the fetch
//! coordinator and mutation router operate on the same buckets. Readers get
//! cloned `Vec`s and can never mutate cache internals. Every write bumps a
//! revision counter published on a watch channel; consumers either re-read
//! on demand or subscribe to the channel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tempora_domain::{MonthKey, ScheduleItem};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// Internal storage behind the shared handle.
struct CacheStorage {
    buckets: HashMap<MonthKey, Vec<ScheduleItem>>,
    /// Bucket recency, least recently used first.
    access_order: Vec<MonthKey>,
    /// Items with `date == None`; never bucketed.
    unscheduled: Vec<ScheduleItem>,
}

impl CacheStorage {
    fn new() -> Self {
        Self { buckets: HashMap::new(), access_order: Vec::new(), unscheduled: Vec::new() }
    }

    fn touch(&mut self, key: MonthKey) {
        self.access_order.retain(|k| *k != key);
        self.access_order.push(key);
    }

    fn remove_bucket(&mut self, key: MonthKey) {
        self.buckets.remove(&key);
        self.access_order.retain(|k| *k != key);
    }
}

/// Month-partitioned cache of schedule items.
///
/// Buckets live until [`MonthCache::reset_all`] or until the bounded LRU
/// policy evicts them; normal navigation never implicitly drops a bucket
/// while it is under the cap.
#[derive(Clone)]
pub struct MonthCache {
    storage: Arc<RwLock<CacheStorage>>,
    max_months: Option<usize>,
    revision: Arc<watch::Sender<u64>>,
}

impl MonthCache {
    /// Create a cache capped at `max_months` buckets (`None` = unbounded).
    pub fn new(max_months: Option<usize>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            storage: Arc::new(RwLock::new(CacheStorage::new())),
            max_months,
            revision: Arc::new(revision),
        }
    }

    /// Whether a bucket exists for the key. Does not refresh recency.
    pub fn has(&self, key: MonthKey) -> bool {
        self.storage.read().buckets.contains_key(&key)
    }

    /// Items cached for the key, in arbitrary stored order; `None` if the
    /// month was never fetched. Refreshes the bucket's recency.
    pub fn get(&self, key: MonthKey) -> Option<Vec<ScheduleItem>> {
        let mut storage = self.storage.write();
        let items = storage.buckets.get(&key).cloned()?;
        storage.touch(key);
        Some(items)
    }

    /// Replace the bucket wholesale with a fetched result. Evicts the least
    /// recently used bucket when a new key pushes the cache over its cap.
    pub fn set(&self, key: MonthKey, items: Vec<ScheduleItem>) {
        {
            let mut storage = self.storage.write();

            if let Some(max) = self.max_months {
                if storage.buckets.len() >= max && !storage.buckets.contains_key(&key) {
                    if let Some(evicted) = storage.access_order.first().copied() {
                        debug!(month = %evicted, "evicting least recently used month bucket");
                        storage.remove_bucket(evicted);
                    }
                }
            }

            storage.buckets.insert(key, items);
            storage.touch(key);
        }
        self.bump();
    }

    /// Snapshot of the unscheduled/backlog list.
    pub fn unscheduled(&self) -> Vec<ScheduleItem> {
        self.storage.read().unscheduled.clone()
    }

    /// Add a confirmed item to its month bucket, or to the unscheduled list
    /// when it has no date. An absent bucket is left absent; a later fetch
    /// picks the item up from the backend.
    pub fn patch_add(&self, item: &ScheduleItem) {
        let changed = {
            let mut storage = self.storage.write();
            match item.month_key() {
                Some(key) => match storage.buckets.get_mut(&key) {
                    Some(bucket) => {
                        bucket.retain(|existing| existing.id != item.id);
                        bucket.push(item.clone());
                        true
                    }
                    None => false,
                },
                None => {
                    storage.unscheduled.retain(|existing| existing.id != item.id);
                    storage.unscheduled.push(item.clone());
                    true
                }
            }
        };
        if changed {
            self.bump();
        }
    }

    /// Remove an item by id from wherever its last known date placed it.
    /// A no-op when that bucket was never cached.
    pub fn patch_remove(&self, id: Uuid, previous_date: Option<NaiveDate>) {
        let changed = {
            let mut storage = self.storage.write();
            Self::detach(&mut storage, id, previous_date)
        };
        if changed {
            self.bump();
        }
    }

    /// Apply a confirmed update: detach the item from its previous location
    /// and attach the new row to wherever its date now points. Maintains the
    /// invariant that an item never appears in two buckets.
    pub fn patch_update(&self, item: &ScheduleItem, previous_date: Option<NaiveDate>) {
        let changed = {
            let mut storage = self.storage.write();
            let removed = Self::detach(&mut storage, item.id, previous_date);

            let added = match item.month_key() {
                Some(key) => match storage.buckets.get_mut(&key) {
                    Some(bucket) => {
                        bucket.retain(|existing| existing.id != item.id);
                        bucket.push(item.clone());
                        true
                    }
                    None => false,
                },
                None => {
                    storage.unscheduled.retain(|existing| existing.id != item.id);
                    storage.unscheduled.push(item.clone());
                    true
                }
            };

            removed || added
        };
        if changed {
            self.bump();
        }
    }

    /// Clear every bucket and the unscheduled list. Used on sign-out.
    pub fn reset_all(&self) {
        {
            let mut storage = self.storage.write();
            storage.buckets.clear();
            storage.access_order.clear();
            storage.unscheduled.clear();
        }
        self.bump();
    }

    /// Number of cached month buckets.
    pub fn cached_months(&self) -> usize {
        self.storage.read().buckets.len()
    }

    /// Subscribe to the revision counter bumped on every cache write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn detach(storage: &mut CacheStorage, id: Uuid, previous_date: Option<NaiveDate>) -> bool {
        match previous_date {
            Some(date) => {
                let key = MonthKey::from_date(date);
                match storage.buckets.get_mut(&key) {
                    Some(bucket) => {
                        let before = bucket.len();
                        bucket.retain(|existing| existing.id != id);
                        bucket.len() != before
                    }
                    None => false,
                }
            }
            None => {
                let before = storage.unscheduled.len();
                storage.unscheduled.retain(|existing| existing.id != id);
                storage.unscheduled.len() != before
            }
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
