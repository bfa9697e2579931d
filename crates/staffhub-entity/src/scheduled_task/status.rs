//! Scheduled task status enumeration.

use serde::{Deserialize, Serialize};

/// Status of a row in `scheduled_tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "scheduled_task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScheduledTaskStatus {
    /// Waiting for its scheduled time.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Finished successfully.
    Completed,
    /// Failed after all attempts.
    Failed,
    /// Cancelled by an operator.
    Cancelled,
}

impl ScheduledTaskStatus {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}
