//! Task entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::{HiringManagerId, TaskId, UserId};

/// Custom field that carries a freeform reminder lead time.
pub const REMINDER_FIELD: &str = "Reminder";
/// Status of a task that has not been started.
pub const STATUS_OPEN: &str = "Open";
/// Status set when a task is completed.
pub const STATUS_COMPLETED: &str = "Completed";
/// Priority given to tasks created without one.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// A to-do item, optionally linked to an organization or hiring manager.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Task ID.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Free-form status.
    pub status: String,
    /// Free-form priority.
    pub priority: String,
    /// Completion flag.
    pub is_completed: bool,
    /// When it was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Due time of day as entered (`14:30`, `2:30 PM`, ...).
    pub due_time: Option<String>,
    /// Legacy reminder lead time in minutes.
    pub reminder_minutes: Option<i32>,
    /// Set once, when the reminder email went out.
    pub reminder_sent_at: Option<DateTime<Utc>>,
    /// Assignee.
    pub assigned_to: Option<UserId>,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Related organization.
    pub organization_id: Option<Uuid>,
    /// Related hiring manager.
    pub hiring_manager_id: Option<HiringManagerId>,
    /// User-defined fields; `Reminder` drives reminder scheduling.
    pub custom_fields: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Data for a new task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Status; defaults to `Open`.
    #[serde(default)]
    pub status: Option<String>,
    /// Priority; defaults to `Medium`.
    #[serde(default)]
    pub priority: Option<String>,
    /// Due date as `YYYY-MM-DD`, `MM/DD/YYYY`, or an RFC 3339 timestamp.
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    /// Due time of day.
    #[serde(default, alias = "dueTime")]
    pub due_time: Option<String>,
    /// Legacy reminder lead time in minutes.
    #[serde(default, alias = "reminderMinutes")]
    pub reminder_minutes: Option<i32>,
    /// Assignee.
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<UserId>,
    /// Related organization.
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<Uuid>,
    /// Related hiring manager.
    #[serde(default, alias = "hiringManagerId")]
    pub hiring_manager_id: Option<HiringManagerId>,
    /// User-defined fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

/// Partial update of a task. `custom_fields` is merged shallowly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// Due date.
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    /// Due time of day.
    #[serde(default, alias = "dueTime")]
    pub due_time: Option<String>,
    /// Legacy reminder lead time in minutes.
    #[serde(default, alias = "reminderMinutes")]
    pub reminder_minutes: Option<i32>,
    /// Assignee.
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<UserId>,
    /// Related organization.
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<Uuid>,
    /// Related hiring manager.
    #[serde(default, alias = "hiringManagerId")]
    pub hiring_manager_id: Option<HiringManagerId>,
    /// Fields to merge into the stored custom fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

impl UpdateTask {
    /// Whether this update moves the reminder window, which re-arms a
    /// reminder that was already sent.
    pub fn touches_schedule(&self) -> bool {
        self.due_date.is_some()
            || self.due_time.is_some()
            || self.reminder_minutes.is_some()
            || self
                .custom_fields
                .as_ref()
                .is_some_and(|fields| fields.get(REMINDER_FIELD).is_some())
    }

    /// Names of the fields this update touches, for the history log.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let candidates = [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("status", self.status.is_some()),
            ("priority", self.priority.is_some()),
            ("due_date", self.due_date.is_some()),
            ("due_time", self.due_time.is_some()),
            ("reminder_minutes", self.reminder_minutes.is_some()),
            ("assigned_to", self.assigned_to.is_some()),
            ("organization_id", self.organization_id.is_some()),
            ("hiring_manager_id", self.hiring_manager_id.is_some()),
            ("custom_fields", self.custom_fields.is_some()),
        ];
        candidates
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

/// Aggregate counters over the tasks visible to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct TaskStats {
    /// All tasks.
    pub total: i64,
    /// Completed tasks.
    pub completed: i64,
    /// Tasks not yet completed.
    pub open: i64,
    /// Open tasks whose due date has passed.
    pub overdue: i64,
    /// Open tasks due today.
    pub due_today: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_touches_schedule() {
        assert!(!UpdateTask::default().touches_schedule());
        let update = UpdateTask {
            due_time: Some("09:00".into()),
            ..Default::default()
        };
        assert!(update.touches_schedule());
        let update = UpdateTask {
            custom_fields: Some(json!({"Reminder": "1 day"})),
            ..Default::default()
        };
        assert!(update.touches_schedule());
        let update = UpdateTask {
            custom_fields: Some(json!({"Source": "Email"})),
            ..Default::default()
        };
        assert!(!update.touches_schedule());
    }

    #[test]
    fn test_update_accepts_camel_case() {
        let update: UpdateTask =
            serde_json::from_str(r#"{"dueDate": "2024-05-01", "reminderMinutes": 30}"#).unwrap();
        assert_eq!(update.due_date.as_deref(), Some("2024-05-01"));
        assert_eq!(update.reminder_minutes, Some(30));
        assert_eq!(update.changed_fields(), vec!["due_date", "reminder_minutes"]);
    }
}
