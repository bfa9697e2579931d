//! CLI command definitions and dispatch.

pub mod migrate;
pub mod reminders;
pub mod transfers;
pub mod worker;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_database::DatabasePool;
use staffhub_database::repositories::{EmailTemplateRepository, TaskRepository};
use staffhub_service::{EmailService, ReminderService, build_mailer};

use crate::output::OutputFormat;

/// StaffHub operator tooling
#[derive(Debug, Parser)]
#[command(name = "staffhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "STAFFHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Task reminder engine
    Reminders(reminders::RemindersArgs),
    /// Scheduled task queue
    Worker(worker::WorkerArgs),
    /// Hiring manager transfers
    Transfers(transfers::TransfersArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        tracing::debug!(env = %self.env, "Configuration loaded");
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Reminders(args) => reminders::execute(args, &config, self.format).await,
            Commands::Worker(args) => worker::execute(args, &config, self.format).await,
            Commands::Transfers(args) => transfers::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: the reminder engine wired against the configured mailer
pub fn reminder_service(config: &AppConfig, pool: &PgPool) -> Result<ReminderService, AppError> {
    let mailer = build_mailer(&config.mail)?;
    let email = Arc::new(EmailService::new(
        Arc::new(EmailTemplateRepository::new(pool.clone())),
        mailer,
    ));
    Ok(ReminderService::new(
        Arc::new(TaskRepository::new(pool.clone())),
        email,
        config.app.public_base_url.clone(),
    ))
}
