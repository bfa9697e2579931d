//! Worker runner: main loop that polls the queue and executes tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;

use staffhub_core::config::WorkerConfig;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::TaskQueue;

/// How long shutdown waits for in-flight tasks.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Polls `scheduled_tasks` and executes claimed rows
#[derive(Debug)]
pub struct WorkerRunner {
    queue: Arc<TaskQueue>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<TaskQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
        }
    }

    /// Run until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let concurrency = self.config.concurrency.max(1);
        tracing::info!(
            worker_id = self.queue.worker_id(),
            concurrency,
            poll_interval_seconds = self.config.poll_interval_seconds,
            handlers = ?self.executor.registered_types(),
            "Worker started"
        );

        if let Err(e) = self.queue.reclaim_stale().await {
            tracing::error!(error = %e, "Failed to reclaim stale scheduled tasks");
        }

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!(worker_id = self.queue.worker_id(), "Worker received shutdown signal");
                        break;
                    }
                }
                claimed = self.poll_and_execute(&semaphore) => {
                    if claimed {
                        continue;
                    }
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                tracing::info!(worker_id = self.queue.worker_id(), "Worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!(worker_id = self.queue.worker_id(), "Waiting for in-flight tasks");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker_id = self.queue.worker_id(), "In-flight tasks did not finish before shutdown");
        }
        tracing::info!(worker_id = self.queue.worker_id(), "Worker shut down complete");
    }

    /// Claim one task and spawn it. Returns `true` if a task was claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() else {
            tracing::trace!("All worker slots occupied");
            return false;
        };

        let task = match self.queue.dequeue().await {
            Ok(Some(task)) => task,
            Ok(None) => {
                tracing::trace!("No scheduled tasks due");
                return false;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to claim scheduled task");
                return false;
            }
        };

        let queue = Arc::clone(&self.queue);
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move {
            let _permit = permit;

            let settled = match executor.execute_isolated(&task).await {
                Ok(result) => {
                    tracing::info!(task_id = %task.id, task_type = %task.task_type, result = %result, "Scheduled task completed");
                    queue.complete(task.id).await
                }
                Err(JobExecutionError::Transient(msg)) if task.can_retry() => {
                    tracing::warn!(
                        task_id = %task.id,
                        attempt = task.attempts,
                        max_attempts = task.max_attempts,
                        error = %msg,
                        "Scheduled task failed, will retry"
                    );
                    queue.retry(&task, &msg).await
                }
                Err(e) => {
                    let msg = e.to_string();
                    tracing::error!(task_id = %task.id, task_type = %task.task_type, error = %msg, "Scheduled task failed");
                    queue.fail(task.id, &msg).await
                }
            };
            if let Err(e) = settled {
                tracing::error!(task_id = %task.id, error = %e, "Failed to record scheduled task outcome");
            }
        });
        true
    }
}
