//! Embedded migration runner.

use sqlx::PgPool;
use tracing::info;

use staffhub_core::error::{AppError, ErrorKind};

/// Run all pending database migrations. Every statement is idempotent, so
/// this is safe against a schema created by hand.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
