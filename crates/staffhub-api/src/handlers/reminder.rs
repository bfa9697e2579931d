//! Task reminder trigger and preview handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use staffhub_service::task::{DueReminder, ReminderRunSummary};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::Actor;
use crate::middleware::rbac;
use crate::state::AppState;

/// GET /api/tasks/reminders/due
///
/// Lists reminders that a run would send right now, without sending.
pub async fn due_reminders(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<ApiResponse<Vec<DueReminder>>>> {
    let due = state.reminder_service.due(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(due)))
}

/// POST /api/tasks/reminders/run
pub async fn run_reminders(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<ReminderRunSummary>>> {
    rbac::require_manager(&actor)?;

    tracing::info!(user_id = %actor.user_id, "Manual reminder run requested");
    let summary = state.reminder_service.run(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
