//! Task reminder commands: the cron-style one-shot run and a preview.

use chrono::Utc;
use clap::{Args, Subcommand};
use tabled::Tabled;

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_service::task::DueReminder;

use crate::output::{self, OutputFormat};

/// Arguments for reminder commands
#[derive(Debug, Args)]
pub struct RemindersArgs {
    /// Reminder subcommand
    #[command(subcommand)]
    pub command: RemindersCommand,
}

/// Reminder subcommands
#[derive(Debug, Subcommand)]
pub enum RemindersCommand {
    /// Send every reminder that is due now
    Run,
    /// List reminders that are due without sending them
    Due,
}

#[derive(Tabled)]
struct DueRow {
    #[tabled(rename = "Task")]
    task_id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due_at: String,
    #[tabled(rename = "Lead (min)")]
    reminder_minutes: i64,
    #[tabled(rename = "Recipients")]
    recipients: String,
}

impl From<&DueReminder> for DueRow {
    fn from(r: &DueReminder) -> Self {
        Self {
            task_id: r.task_id.to_string(),
            title: r.title.clone(),
            due_at: r.due_at.format("%Y-%m-%d %H:%M").to_string(),
            reminder_minutes: r.reminder_minutes,
            recipients: r.recipients.join(", "),
        }
    }
}

/// Execute reminder commands
pub async fn execute(
    args: &RemindersArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let service = super::reminder_service(config, &pool)?;

    match &args.command {
        RemindersCommand::Run => {
            let summary = service.run(Utc::now()).await?;
            match format {
                OutputFormat::Json => output::print_json(&summary),
                OutputFormat::Table => {
                    println!("Reminder run:");
                    output::print_kv("Scanned", &summary.scanned.to_string());
                    output::print_kv("Due", &summary.due.to_string());
                    output::print_kv("Sent", &summary.sent.to_string());
                    output::print_kv("Skipped", &summary.skipped.to_string());
                    output::print_kv("Failures", &summary.failures.len().to_string());
                    for failure in &summary.failures {
                        output::print_warning(&format!("{}: {}", failure.task_id, failure.error));
                    }
                }
            }
            if !summary.failures.is_empty() {
                return Err(AppError::external_service(format!(
                    "{} reminder(s) failed",
                    summary.failures.len()
                )));
            }
        }
        RemindersCommand::Due => {
            let due = service.due(Utc::now()).await?;
            let rows: Vec<DueRow> = due.iter().map(DueRow::from).collect();
            output::print_list(&rows, &due, format);
        }
    }

    Ok(())
}
