//! Schedule item and calendar partition types
//!
//! These mirror the rows stored by the backing service. Field names match
//! the row columns so the types deserialize straight from query results.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grid::MonthKey;

/// Completion state of a schedule item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Completed,
}

/// A dated event or task row.
///
/// `date == None` marks an unscheduled/backlog item; those are held in a
/// separate list and never bucketed by month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub scheduled_at: Option<NaiveTime>,
    #[serde(default)]
    pub status: ItemStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScheduleItem {
    /// Cache partition key for the item's date, if it has one.
    pub fn month_key(&self) -> Option<MonthKey> {
        self.date.map(MonthKey::from_date)
    }

    /// Whether the item sits outside every month bucket.
    pub fn is_unscheduled(&self) -> bool {
        self.date.is_none()
    }
}

/// Payload for creating an item, and for updates (full replace, matching the
/// backing service's update shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduleItem {
    pub calendar_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub scheduled_at: Option<NaiveTime>,
}

/// A calendar the user is a member of: the authorization partition gating
/// item queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_shared: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(date: Option<NaiveDate>) -> ScheduleItem {
        ScheduleItem {
            id: Uuid::new_v4(),
            calendar_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: "Dentist".into(),
            description: None,
            location: None,
            date,
            scheduled_at: None,
            status: ItemStatus::default(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn month_key_follows_the_item_date() {
        let dated = item(NaiveDate::from_ymd_opt(2025, 6, 15));
        assert_eq!(dated.month_key(), Some(MonthKey { year: 2025, month0: 5 }));
        assert!(!dated.is_unscheduled());

        let backlog = item(None);
        assert_eq!(backlog.month_key(), None);
        assert!(backlog.is_unscheduled());
    }

    #[test]
    fn status_serializes_lowercase_and_defaults_to_pending() {
        let json = serde_json::to_string(&ItemStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let row = serde_json::json!({
            "id": Uuid::nil(),
            "calendar_id": Uuid::nil(),
            "created_by": Uuid::nil(),
            "title": "Standup",
            "description": null,
            "location": null,
            "date": "2025-06-02",
            "scheduled_at": "09:30:00",
            "created_at": null,
            "updated_at": null,
        });
        let item: ScheduleItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.status, ItemStatus::Pending);
    }
}
