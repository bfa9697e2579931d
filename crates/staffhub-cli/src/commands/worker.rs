//! Scheduled task queue commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use tabled::Tabled;
use uuid::Uuid;

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_core::types::pagination::PageRequest;
use staffhub_database::repositories::ScheduledTaskRepository;
use staffhub_entity::scheduled_task::{ScheduledTask, ScheduledTaskPayload, ScheduledTaskStatus};
use staffhub_worker::TaskQueue;

use crate::output::{self, OutputFormat};

/// Arguments for worker commands
#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// Worker subcommand
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// Show queue counts by status
    Status,
    /// List scheduled tasks
    List {
        /// Only tasks in this status (pending, running, completed, failed, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Make a pending or failed task runnable immediately
    Trigger {
        /// Scheduled task ID
        id: Uuid,
    },
    /// Queue a reminder scan unless one is already pending
    ScanReminders,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    task_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scheduled")]
    scheduled_for: String,
    #[tabled(rename = "Attempts")]
    attempts: String,
    #[tabled(rename = "Last Error")]
    last_error: String,
}

impl From<&ScheduledTask> for TaskRow {
    fn from(t: &ScheduledTask) -> Self {
        Self {
            id: t.id.to_string(),
            task_type: t.task_type.clone(),
            status: t.status.as_str().to_string(),
            scheduled_for: t.scheduled_for.format("%Y-%m-%d %H:%M").to_string(),
            attempts: format!("{}/{}", t.attempts, t.max_attempts),
            last_error: t.last_error.clone().unwrap_or_default(),
        }
    }
}

fn parse_status(raw: &str) -> Result<ScheduledTaskStatus, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => Ok(ScheduledTaskStatus::Pending),
        "running" => Ok(ScheduledTaskStatus::Running),
        "completed" => Ok(ScheduledTaskStatus::Completed),
        "failed" => Ok(ScheduledTaskStatus::Failed),
        "cancelled" => Ok(ScheduledTaskStatus::Cancelled),
        other => Err(AppError::validation(format!("Unknown task status: '{other}'"))),
    }
}

/// Execute worker commands
pub async fn execute(
    args: &WorkerArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let queue = TaskQueue::new(Arc::new(ScheduledTaskRepository::new(pool)), "cli")
        .with_stale_after(config.worker.stale_after_minutes);

    match &args.command {
        WorkerCommand::Status => {
            let stats = queue.stats().await?;
            match format {
                OutputFormat::Json => output::print_json(&stats),
                OutputFormat::Table => {
                    println!("Scheduled Task Queue:");
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Running", &stats.running.to_string());
                    output::print_kv("Completed", &stats.completed.to_string());
                    output::print_kv("Failed", &stats.failed.to_string());
                    output::print_kv("Cancelled", &stats.cancelled.to_string());
                    output::print_kv("Worker Enabled", &config.worker.enabled.to_string());
                    output::print_kv("Concurrency", &config.worker.concurrency.to_string());
                    output::print_kv("Reminder Cron", &config.worker.reminder_cron);
                }
            }
        }
        WorkerCommand::List { status, page } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let tasks = queue.list(status, PageRequest::new(*page, 50)).await?;
            let rows: Vec<TaskRow> = tasks.items.iter().map(TaskRow::from).collect();
            output::print_list(&rows, &tasks, format);
        }
        WorkerCommand::Trigger { id } => {
            if queue.trigger(*id).await? {
                output::print_success(&format!("Task {id} will run on the next poll"));
            } else {
                return Err(AppError::not_found(format!(
                    "No pending or failed task with id {id}"
                )));
            }
        }
        WorkerCommand::ScanReminders => {
            match queue
                .enqueue_unique(&ScheduledTaskPayload::TaskReminderScan, 1)
                .await?
            {
                Some(task) => output::print_success(&format!("Reminder scan queued (id: {})", task.id)),
                None => output::print_warning("A reminder scan is already pending"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(" Failed ").unwrap(), ScheduledTaskStatus::Failed);
        assert!(parse_status("done").is_err());
    }
}
