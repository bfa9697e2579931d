//! Queue over the `scheduled_tasks` table.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::ScheduledTaskRepository;
use staffhub_entity::scheduled_task::{
    CreateScheduledTask, ScheduledTask, ScheduledTaskPayload, ScheduledTaskStatus,
};

/// Base delay before the first retry of a transient failure.
const RETRY_BASE_SECONDS: i64 = 60;
/// Upper bound on the retry delay.
const RETRY_MAX_SECONDS: i64 = 3600;
/// Default time a claimed task may stay `running`.
const DEFAULT_STALE_AFTER_MINUTES: i64 = 30;

/// Enqueue, claim, and settle scheduled tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    repo: Arc<ScheduledTaskRepository>,
    worker_id: String,
    stale_after: Duration,
}

impl TaskQueue {
    /// Create a new queue bound to a worker identity
    pub fn new(repo: Arc<ScheduledTaskRepository>, worker_id: impl Into<String>) -> Self {
        Self {
            repo,
            worker_id: worker_id.into(),
            stale_after: Duration::minutes(DEFAULT_STALE_AFTER_MINUTES),
        }
    }

    /// Override how long a claimed task may stay `running`
    pub fn with_stale_after(mut self, minutes: i64) -> Self {
        if let Some(window) = Duration::try_minutes(minutes.max(1)) {
            self.stale_after = window;
        }
        self
    }

    /// Worker identity recorded on claimed rows
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a typed payload
    pub async fn enqueue(
        &self,
        payload: &ScheduledTaskPayload,
        scheduled_for: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<ScheduledTask, AppError> {
        let task = self
            .repo
            .create(&CreateScheduledTask {
                task_type: payload.task_type().to_string(),
                payload: payload.to_json()?,
                scheduled_for,
                max_attempts,
            })
            .await?;

        tracing::debug!(
            task_id = %task.id,
            task_type = %task.task_type,
            scheduled_for = %task.scheduled_for,
            "Enqueued scheduled task"
        );
        Ok(task)
    }

    /// Enqueue unless a pending or running task of the same type exists.
    /// Returns `None` when skipped.
    pub async fn enqueue_unique(
        &self,
        payload: &ScheduledTaskPayload,
        max_attempts: i32,
    ) -> Result<Option<ScheduledTask>, AppError> {
        self.reclaim_stale().await?;
        if self.repo.has_active(payload.task_type()).await? {
            tracing::debug!(task_type = payload.task_type(), "Task already queued, skipping");
            return Ok(None);
        }
        self.enqueue(payload, Utc::now(), max_attempts).await.map(Some)
    }

    /// Fail tasks left `running` longer than the stale window, which
    /// happens when a worker dies mid-run. Returns how many were reclaimed.
    pub async fn reclaim_stale(&self) -> Result<u64, AppError> {
        let cutoff = stale_cutoff(Utc::now(), self.stale_after);
        let reclaimed = self
            .repo
            .fail_stale_running(cutoff, "Abandoned: still running after the stale window")
            .await?;
        if reclaimed > 0 {
            tracing::warn!(reclaimed, cutoff = %cutoff, "Reclaimed stale scheduled tasks");
        }
        Ok(reclaimed)
    }

    /// Claim the next due task
    pub async fn dequeue(&self) -> Result<Option<ScheduledTask>, AppError> {
        let task = self.repo.claim_next(&self.worker_id).await?;
        if let Some(task) = &task {
            tracing::debug!(task_id = %task.id, task_type = %task.task_type, "Claimed scheduled task");
        }
        Ok(task)
    }

    /// Mark a task completed
    pub async fn complete(&self, task_id: Uuid) -> Result<(), AppError> {
        self.repo.complete(task_id).await?;
        tracing::debug!(task_id = %task_id, "Scheduled task completed");
        Ok(())
    }

    /// Mark a task permanently failed
    pub async fn fail(&self, task_id: Uuid, error: &str) -> Result<(), AppError> {
        self.repo.fail(task_id, error).await?;
        tracing::debug!(task_id = %task_id, error, "Scheduled task failed");
        Ok(())
    }

    /// Put a task back in the queue with exponential backoff
    pub async fn retry(&self, task: &ScheduledTask, error: &str) -> Result<(), AppError> {
        let retry_at = Utc::now() + retry_delay(task.attempts);
        self.repo.reschedule(task.id, error, retry_at).await?;
        tracing::debug!(task_id = %task.id, retry_at = %retry_at, "Scheduled task will retry");
        Ok(())
    }

    /// Make a pending task due now. Returns `false` if it is not pending.
    pub async fn trigger(&self, task_id: Uuid) -> Result<bool, AppError> {
        self.repo.run_now(task_id).await
    }

    /// Look up one task
    pub async fn get(&self, task_id: Uuid) -> Result<Option<ScheduledTask>, AppError> {
        self.repo.find_by_id(task_id).await
    }

    /// List tasks, optionally by status
    pub async fn list(
        &self,
        status: Option<ScheduledTaskStatus>,
        page: PageRequest,
    ) -> Result<PageResponse<ScheduledTask>, AppError> {
        self.repo.find_all(status, &page).await
    }

    /// Delete finished tasks older than `retention`
    pub async fn prune(&self, retention: Duration) -> Result<u64, AppError> {
        let removed = self.repo.cleanup_finished(Utc::now() - retention).await?;
        if removed > 0 {
            tracing::info!(removed, "Pruned finished scheduled tasks");
        }
        Ok(removed)
    }

    /// Get queue statistics
    pub async fn stats(&self) -> Result<QueueStats, AppError> {
        let mut stats = QueueStats {
            worker_id: self.worker_id.clone(),
            ..Default::default()
        };
        for (status, count) in self.repo.count_by_status().await? {
            match status {
                ScheduledTaskStatus::Pending => stats.pending = count,
                ScheduledTaskStatus::Running => stats.running = count,
                ScheduledTaskStatus::Completed => stats.completed = count,
                ScheduledTaskStatus::Failed => stats.failed = count,
                ScheduledTaskStatus::Cancelled => stats.cancelled = count,
            }
        }
        Ok(stats)
    }
}

/// Queue statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending tasks
    pub pending: i64,
    /// Number of running tasks
    pub running: i64,
    /// Number of completed tasks
    pub completed: i64,
    /// Number of failed tasks
    pub failed: i64,
    /// Number of cancelled tasks
    pub cancelled: i64,
    /// Current worker identifier
    pub worker_id: String,
}

/// Delay before retrying after `attempts` attempts: doubles from one
/// minute, capped at one hour.
pub fn retry_delay(attempts: i32) -> Duration {
    let exponent = attempts.saturating_sub(1).clamp(0, 16) as u32;
    let seconds = RETRY_BASE_SECONDS.saturating_mul(1_i64 << exponent);
    Duration::seconds(seconds.min(RETRY_MAX_SECONDS))
}

/// Rows claimed before this instant are considered abandoned.
pub fn stale_cutoff(now: DateTime<Utc>, stale_after: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(stale_after).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles() {
        assert_eq!(retry_delay(1), Duration::seconds(60));
        assert_eq!(retry_delay(2), Duration::seconds(120));
        assert_eq!(retry_delay(3), Duration::seconds(240));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        assert_eq!(retry_delay(10), Duration::seconds(RETRY_MAX_SECONDS));
        assert_eq!(retry_delay(i32::MAX), Duration::seconds(RETRY_MAX_SECONDS));
    }

    #[test]
    fn test_retry_delay_handles_zero_attempts() {
        assert_eq!(retry_delay(0), Duration::seconds(60));
    }

    #[test]
    fn test_stale_cutoff() {
        let now = Utc::now();
        assert_eq!(stale_cutoff(now, Duration::minutes(30)), now - Duration::minutes(30));
        assert_eq!(
            stale_cutoff(DateTime::<Utc>::MIN_UTC, Duration::minutes(1)),
            DateTime::<Utc>::MIN_UTC
        );
    }
}
