//! Task CRUD, completion toggle, stats, notes, and history handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use staffhub_core::types::TaskId;
use staffhub_core::types::pagination::PageResponse;
use staffhub_database::repositories::TaskFilter;
use staffhub_entity::note::{CreateNote, HistoryEntry, Note};
use staffhub_entity::task::{CreateTask, Task, TaskStats, UpdateTask};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/tasks?completed=&hiring_manager_id=&organization_id=
pub async fn list_tasks(
    State(state): State<AppState>,
    actor: Actor,
    Query(filter): Query<TaskFilter>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Task>>>> {
    let tasks = state
        .task_service
        .list(&actor, &filter, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    let task = state.task_service.create(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}

/// GET /api/tasks/stats
pub async fn stats(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<TaskStats>>> {
    let stats = state.task_service.stats(&actor).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id: TaskId = parse_id(&id)?;
    let task = state.task_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id: TaskId = parse_id(&id)?;
    let task = state.task_service.update(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: TaskId = parse_id(&id)?;
    state.task_service.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Task deleted"))))
}

/// POST /api/tasks/{id}/complete
pub async fn complete_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id: TaskId = parse_id(&id)?;
    let task = state.task_service.complete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// POST /api/tasks/{id}/reopen
pub async fn reopen_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id: TaskId = parse_id(&id)?;
    let task = state.task_service.reopen(&actor, id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// GET /api/tasks/{id}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Note>>>> {
    let id: TaskId = parse_id(&id)?;
    let notes = state.task_service.notes(&actor, id).await?;
    Ok(Json(ApiResponse::ok(notes)))
}

/// POST /api/tasks/{id}/notes
pub async fn add_note(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<CreateNote>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Note>>)> {
    let id: TaskId = parse_id(&id)?;
    let note = state.task_service.add_note(&actor, id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(note))))
}

/// GET /api/tasks/{id}/history
pub async fn history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<HistoryEntry>>>> {
    let id: TaskId = parse_id(&id)?;
    let entries = state.task_service.history(&actor, id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
