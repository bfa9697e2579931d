//! Periodic task reminder scan.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use staffhub_entity::scheduled_task::ScheduledTask;
use staffhub_entity::scheduled_task::payload::TASK_REMINDER_SCAN;
use staffhub_service::ReminderService;

use crate::executor::{JobExecutionError, JobHandler};

/// Runs the reminder engine once per claimed task
#[derive(Debug)]
pub struct ReminderScanJobHandler {
    reminders: Arc<ReminderService>,
}

impl ReminderScanJobHandler {
    /// Create a new reminder scan handler
    pub fn new(reminders: Arc<ReminderService>) -> Self {
        Self { reminders }
    }
}

#[async_trait]
impl JobHandler for ReminderScanJobHandler {
    fn task_type(&self) -> &str {
        TASK_REMINDER_SCAN
    }

    async fn execute(&self, _task: &ScheduledTask) -> Result<Value, JobExecutionError> {
        let summary = self
            .reminders
            .run(Utc::now())
            .await
            .map_err(JobExecutionError::from_service)?;

        // Per-task failures are part of the summary; the scan itself succeeded.
        Ok(serde_json::to_value(&summary).map_err(staffhub_core::AppError::from)?)
    }
}
