//! Scheduled task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ScheduledTaskStatus;

/// A unit of deferred work.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledTask {
    /// Row ID.
    pub id: Uuid,
    /// Handler key (`hiring_manager_transfer_cleanup`, `task_reminder_scan`).
    pub task_type: String,
    /// Handler input.
    pub payload: serde_json::Value,
    /// Current status.
    pub status: ScheduledTaskStatus,
    /// Earliest time a worker may claim it.
    pub scheduled_for: DateTime<Utc>,
    /// Attempts so far.
    pub attempts: i32,
    /// Attempts allowed.
    pub max_attempts: i32,
    /// Most recent failure.
    pub last_error: Option<String>,
    /// Worker that claimed it.
    pub worker_id: Option<String>,
    /// Claim time.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

impl ScheduledTask {
    /// Check if a failed attempt may be retried.
    pub fn can_retry(&self) -> bool {
        !self.status.is_terminal() && self.attempts < self.max_attempts
    }
}

/// Data for a new scheduled task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduledTask {
    /// Handler key.
    pub task_type: String,
    /// Handler input.
    pub payload: serde_json::Value,
    /// Earliest run time.
    pub scheduled_for: DateTime<Utc>,
    /// Attempts allowed.
    pub max_attempts: i32,
}
