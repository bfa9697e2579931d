//! Cron scheduler for periodic work.

use std::sync::Arc;

use chrono::Duration;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use staffhub_core::config::WorkerConfig;
use staffhub_core::error::AppError;
use staffhub_entity::scheduled_task::ScheduledTaskPayload;

use crate::queue::TaskQueue;

/// Daily at 03:30.
const PRUNE_SCHEDULE: &str = "0 30 3 * * *";
/// Finished rows are kept this long.
const PRUNE_RETENTION_DAYS: i64 = 30;
/// A reminder scan is cheap to repeat, so it is not retried.
const REMINDER_SCAN_MAX_ATTEMPTS: i32 = 1;

/// Cron-based scheduler that feeds the task queue
pub struct CronScheduler {
    scheduler: JobScheduler,
    queue: Arc<TaskQueue>,
    reminder_cron: String,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("reminder_cron", &self.reminder_cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<TaskQueue>, config: &WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            queue,
            reminder_cron: config.reminder_cron.clone(),
        })
    }

    /// Register all periodic jobs
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_reminder_scan().await?;
        self.register_queue_pruning().await?;

        tracing::info!("All scheduled jobs registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut down the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Enqueue a reminder scan unless one is already pending or running
    async fn register_reminder_scan(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(self.reminder_cron.as_str(), move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling task reminder scan");
                if let Err(e) = queue
                    .enqueue_unique(
                        &ScheduledTaskPayload::TaskReminderScan,
                        REMINDER_SCAN_MAX_ATTEMPTS,
                    )
                    .await
                {
                    tracing::error!(error = %e, "Failed to enqueue task reminder scan");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid reminder cron expression '{}': {e}",
                self.reminder_cron
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add reminder scan schedule: {e}"))
        })?;

        tracing::info!(cron = %self.reminder_cron, "Registered: task_reminder_scan");
        Ok(())
    }

    /// Delete old finished queue rows
    async fn register_queue_pruning(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(PRUNE_SCHEDULE, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                if let Err(e) = queue.prune(Duration::days(PRUNE_RETENTION_DAYS)).await {
                    tracing::error!(error = %e, "Failed to prune scheduled tasks");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create prune schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add prune schedule: {e}")))?;

        tracing::info!("Registered: scheduled task pruning (daily at 03:30)");
        Ok(())
    }
}
