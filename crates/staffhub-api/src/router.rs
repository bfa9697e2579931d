//! Route definitions for the StaffHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(organization_routes())
        .merge(hiring_manager_routes())
        .merge(task_routes())
        .merge(transfer_routes())
        .merge(team_routes())
        .merge(user_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

fn organization_routes() -> Router<AppState> {
    use handlers::organization as h;
    Router::new()
        .route(
            "/organizations",
            get(h::list_organizations).post(h::create_organization),
        )
        .route(
            "/organizations/{id}",
            get(h::get_organization)
                .put(h::update_organization)
                .delete(h::delete_organization),
        )
        .route(
            "/organizations/{id}/notes",
            get(h::list_notes).post(h::add_note),
        )
        .route("/organizations/{id}/history", get(h::history))
}

fn hiring_manager_routes() -> Router<AppState> {
    use handlers::hiring_manager as h;
    Router::new()
        .route(
            "/hiring-managers",
            get(h::list_hiring_managers).post(h::create_hiring_manager),
        )
        .route(
            "/hiring-managers/{id}",
            get(h::get_hiring_manager)
                .put(h::update_hiring_manager)
                .delete(h::delete_hiring_manager),
        )
        .route(
            "/hiring-managers/{id}/notes",
            get(h::list_notes).post(h::add_note),
        )
        .route("/hiring-managers/{id}/documents", get(h::list_documents))
        .route("/hiring-managers/{id}/transfers", get(h::list_transfers))
}

/// Tasks plus the reminder engine triggers
fn task_routes() -> Router<AppState> {
    use handlers::task as h;
    Router::new()
        .route("/tasks", get(h::list_tasks).post(h::create_task))
        .route("/tasks/stats", get(h::stats))
        .route(
            "/tasks/reminders/due",
            get(handlers::reminder::due_reminders),
        )
        .route(
            "/tasks/reminders/run",
            post(handlers::reminder::run_reminders),
        )
        .route(
            "/tasks/{id}",
            get(h::get_task).put(h::update_task).delete(h::delete_task),
        )
        .route("/tasks/{id}/complete", post(h::complete_task))
        .route("/tasks/{id}/reopen", post(h::reopen_task))
        .route("/tasks/{id}/notes", get(h::list_notes).post(h::add_note))
        .route("/tasks/{id}/history", get(h::history))
}

fn transfer_routes() -> Router<AppState> {
    use handlers::transfer as h;
    Router::new()
        .route(
            "/hiring-manager-transfers",
            get(h::list_transfers).post(h::create_transfer),
        )
        .route("/hiring-manager-transfers/{id}", get(h::get_transfer))
        .route(
            "/hiring-manager-transfers/{id}/approve",
            post(h::approve_transfer),
        )
        .route(
            "/hiring-manager-transfers/{id}/deny",
            post(h::deny_transfer),
        )
}

fn team_routes() -> Router<AppState> {
    use handlers::team as h;
    Router::new()
        .route("/teams", get(h::list_teams).post(h::create_team))
        .route(
            "/teams/{id}",
            get(h::get_team).put(h::update_team).delete(h::delete_team),
        )
        .route(
            "/teams/{id}/members",
            get(h::list_members).post(h::add_member),
        )
        .route("/teams/{id}/members/{user_id}", delete(h::remove_member))
}

/// User directory (reads) and admin user management (writes)
fn user_routes() -> Router<AppState> {
    use handlers::user as h;
    Router::new()
        .route("/users", get(h::list_users).post(h::create_user))
        .route(
            "/users/{id}",
            get(h::get_user).put(h::update_user).delete(h::delete_user),
        )
}
