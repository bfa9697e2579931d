//! Application builder: wires router, middleware, and state into an Axum app
//! and serves it.

use std::future::Future;

use axum::Router;

use staffhub_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("StaffHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
