//! In-memory mocks for the backing-store ports.
//!
//! [`MockItemStore`] keeps rows in a `Vec`, counts queries, and can be
//! scripted to fail, so tests can verify both the single-flight property
//! (via the call counter) and the failure semantics (bucket left absent,
//! cache untouched on rejected mutations).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempora_core::ports::{ItemStore, MembershipDirectory};
use tempora_domain::{
    DateRange, ItemStatus, NewScheduleItem, Result, ScheduleItem, TemporaError,
};
use uuid::Uuid;

/// In-memory mock for [`ItemStore`].
#[derive(Default, Clone)]
pub struct MockItemStore {
    rows: Arc<Mutex<Vec<ScheduleItem>>>,
    query_calls: Arc<AtomicUsize>,
    fail_queries: Arc<AtomicBool>,
    reject_mutations: Arc<AtomicBool>,
}

impl MockItemStore {
    /// Create a mock seeded with the provided rows.
    pub fn seeded(rows: Vec<ScheduleItem>) -> Self {
        let store = Self::default();
        *store.rows.lock() = rows;
        store
    }

    /// Number of `query_items` calls made so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Make every `query_items` call fail until cleared.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make every mutation call fail until cleared.
    pub fn set_reject_mutations(&self, reject: bool) {
        self.reject_mutations.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of the stored rows.
    pub fn rows(&self) -> Vec<ScheduleItem> {
        self.rows.lock().clone()
    }

    fn materialize(draft: NewScheduleItem, id: Uuid) -> ScheduleItem {
        ScheduleItem {
            id,
            calendar_id: draft.calendar_id,
            created_by: draft.created_by,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            date: draft.date,
            scheduled_at: draft.scheduled_at,
            status: ItemStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }
}

#[async_trait]
impl ItemStore for MockItemStore {
    async fn query_items(
        &self,
        calendar_ids: &[Uuid],
        range: DateRange,
    ) -> Result<Vec<ScheduleItem>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to pile onto the in-flight handle
        // before the "response" arrives.
        tokio::task::yield_now().await;

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(TemporaError::Fetch("backend unavailable".into()));
        }

        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|row| {
                calendar_ids.contains(&row.calendar_id)
                    && row.date.is_some_and(|day| range.contains(day))
            })
            .cloned()
            .collect())
    }

    async fn insert_item(&self, draft: NewScheduleItem) -> Result<ScheduleItem> {
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Err(TemporaError::MutationRejected("insert rejected".into()));
        }
        let row = Self::materialize(draft, Uuid::new_v4());
        self.rows.lock().push(row.clone());
        Ok(row)
    }

    async fn update_item(&self, id: Uuid, changes: NewScheduleItem) -> Result<ScheduleItem> {
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Err(TemporaError::MutationRejected("update rejected".into()));
        }
        let mut rows = self.rows.lock();
        if !rows.iter().any(|row| row.id == id) {
            return Err(TemporaError::NotFound(format!("item {id}")));
        }
        let row = Self::materialize(changes, id);
        rows.retain(|existing| existing.id != id);
        rows.push(row.clone());
        Ok(row)
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Err(TemporaError::MutationRejected("delete rejected".into()));
        }
        self.rows.lock().retain(|existing| existing.id != id);
        Ok(())
    }
}

/// In-memory mock for [`MembershipDirectory`].
#[derive(Default, Clone)]
pub struct MockMembershipDirectory {
    calendars: Arc<Mutex<Vec<Uuid>>>,
}

impl MockMembershipDirectory {
    /// Create a directory authorizing the given calendars.
    pub fn with_calendars(calendars: Vec<Uuid>) -> Self {
        Self { calendars: Arc::new(Mutex::new(calendars)) }
    }

    /// Replace the authorized calendar list.
    pub fn set_calendars(&self, calendars: Vec<Uuid>) {
        *self.calendars.lock() = calendars;
    }
}

#[async_trait]
impl MembershipDirectory for MockMembershipDirectory {
    async fn authorized_calendars(&self, _user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self.calendars.lock().clone())
    }
}
