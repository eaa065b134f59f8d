//! Port interfaces for the backing-store collaborator
//!
//! These traits define the boundaries between the engine and the external
//! managed service that owns storage, authentication, and transport. The
//! engine never talks to a network or database directly; adapters implement
//! these traits.

use async_trait::async_trait;
use tempora_domain::{DateRange, NewScheduleItem, Result, ScheduleItem};
use uuid::Uuid;

/// Row-oriented access to schedule items.
///
/// Every call is assumed to either return the authoritative persisted row or
/// fail with a structured error; the engine only patches its cache from a
/// returned row, never from the payload it sent.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch all items in the given calendars whose date falls within the
    /// range (inclusive).
    async fn query_items(
        &self,
        calendar_ids: &[Uuid],
        range: DateRange,
    ) -> Result<Vec<ScheduleItem>>;

    /// Persist a new item and return the stored row.
    async fn insert_item(&self, draft: NewScheduleItem) -> Result<ScheduleItem>;

    /// Replace an item's fields and return the stored row.
    async fn update_item(&self, id: Uuid, changes: NewScheduleItem) -> Result<ScheduleItem>;

    /// Delete an item by id.
    async fn delete_item(&self, id: Uuid) -> Result<()>;
}

/// Supplies the calendar ids the user is authorized to read.
///
/// An empty list means "nothing to fetch", which is a normal state during
/// initial load, not an error.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// List the calendar ids the user is a member of.
    async fn authorized_calendars(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}
