//! StaffHub Server: recruiting CRM backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use staffhub_api::AppState;
use staffhub_api::error::configure_error_exposure;
use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_database::DatabasePool;
use staffhub_database::repositories::ScheduledTaskRepository;
use staffhub_worker::jobs::{ReminderScanJobHandler, TransferCleanupJobHandler};
use staffhub_worker::{CronScheduler, JobExecutor, TaskQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `STAFFHUB_ENV` overlay, and environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STAFFHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.app.environment,
        "Starting StaffHub v{}",
        env!("CARGO_PKG_VERSION")
    );

    configure_error_exposure(!config.is_production());

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?.into_pool();

    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        staffhub_database::migration::run_migrations(&db_pool).await?;
        tracing::info!("Database migrations complete");
    }

    // ── Step 2: Services ─────────────────────────────────────────
    let state = AppState::build(config.clone(), db_pool.clone())?;

    // ── Step 3: Shutdown channel & worker ────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut scheduler = None;
    let worker_handle = if config.worker.enabled {
        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let queue = Arc::new(
            TaskQueue::new(
                Arc::new(ScheduledTaskRepository::new(db_pool.clone())),
                worker_id,
            )
            .with_stale_after(config.worker.stale_after_minutes),
        );

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(ReminderScanJobHandler::new(Arc::clone(
            &state.reminder_service,
        ))));
        executor.register(Arc::new(TransferCleanupJobHandler::new(Arc::clone(
            &state.transfer_service,
        ))));
        let executor = Arc::new(executor);
        tracing::info!(handlers = ?executor.registered_types(), "Job handlers registered");

        let cron = CronScheduler::new(Arc::clone(&queue), &config.worker).await?;
        cron.register_default_tasks().await?;
        cron.start().await?;
        scheduler = Some(cron);

        let runner = WorkerRunner::new(queue, executor, config.worker.clone());
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            runner.run(cancel).await;
        }))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 4: HTTP server with graceful shutdown ───────────────
    staffhub_api::serve(state, async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await?;

    // ── Step 5: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");

    if let Some(mut cron) = scheduler {
        if let Err(e) = cron.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(Duration::from_secs(30), handle).await;
    }

    db_pool.close().await;
    tracing::info!("StaffHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
