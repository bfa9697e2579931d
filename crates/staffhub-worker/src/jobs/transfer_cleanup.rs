//! Deferred sweep after a hiring manager transfer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use staffhub_entity::scheduled_task::payload::TRANSFER_CLEANUP;
use staffhub_entity::scheduled_task::{ScheduledTask, ScheduledTaskPayload};
use staffhub_service::TransferService;

use crate::executor::{JobExecutionError, JobHandler};

/// Moves records left on an archived source onto the transfer target
#[derive(Debug)]
pub struct TransferCleanupJobHandler {
    transfers: Arc<TransferService>,
}

impl TransferCleanupJobHandler {
    /// Create a new transfer cleanup handler
    pub fn new(transfers: Arc<TransferService>) -> Self {
        Self { transfers }
    }
}

#[async_trait]
impl JobHandler for TransferCleanupJobHandler {
    fn task_type(&self) -> &str {
        TRANSFER_CLEANUP
    }

    async fn execute(&self, task: &ScheduledTask) -> Result<Value, JobExecutionError> {
        let (transfer_id, source, target) = match ScheduledTaskPayload::from_json(&task.payload) {
            Ok(ScheduledTaskPayload::TransferCleanup {
                transfer_id,
                source_hiring_manager_id,
                target_hiring_manager_id,
            }) => (transfer_id, source_hiring_manager_id, target_hiring_manager_id),
            Ok(other) => {
                return Err(JobExecutionError::Permanent(format!(
                    "Unexpected payload '{}' for transfer cleanup",
                    other.task_type()
                )));
            }
            Err(e) => {
                return Err(JobExecutionError::Permanent(format!(
                    "Invalid transfer cleanup payload: {}",
                    e.message
                )));
            }
        };

        let summary = self
            .transfers
            .run_cleanup(transfer_id, source, target)
            .await
            .map_err(JobExecutionError::from_service)?;

        Ok(match summary {
            Some(summary) => json!({
                "transfer_id": transfer_id,
                "status": "completed",
                "notes_moved": summary.notes_moved,
                "documents_moved": summary.documents_moved,
                "tasks_moved": summary.tasks_moved,
            }),
            None => json!({ "transfer_id": transfer_id, "status": "skipped" }),
        })
    }
}
