//! Hiring manager CRUD, notes, documents, and transfer listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use staffhub_core::types::HiringManagerId;
use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::document::Document;
use staffhub_entity::hiring_manager::{CreateHiringManager, HiringManager, UpdateHiringManager};
use staffhub_entity::note::{CreateNote, Note};
use staffhub_entity::transfer::HiringManagerTransfer;

use crate::dto::request::HiringManagerQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/hiring-managers?organization_id=&status=
pub async fn list_hiring_managers(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<HiringManagerQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<HiringManager>>>> {
    let hms = state
        .hiring_manager_service
        .list(
            &actor,
            query.organization_id,
            query.status.as_deref(),
            page.into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(hms)))
}

/// POST /api/hiring-managers
pub async fn create_hiring_manager(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateHiringManager>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HiringManager>>)> {
    let hm = state.hiring_manager_service.create(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(hm))))
}

/// GET /api/hiring-managers/{id}
pub async fn get_hiring_manager(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<HiringManager>>> {
    let id: HiringManagerId = parse_id(&id)?;
    let hm = state.hiring_manager_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(hm)))
}

/// PUT /api/hiring-managers/{id}
pub async fn update_hiring_manager(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateHiringManager>,
) -> ApiResult<Json<ApiResponse<HiringManager>>> {
    let id: HiringManagerId = parse_id(&id)?;
    let hm = state.hiring_manager_service.update(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(hm)))
}

/// DELETE /api/hiring-managers/{id}
pub async fn delete_hiring_manager(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: HiringManagerId = parse_id(&id)?;
    state.hiring_manager_service.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Hiring manager deleted",
    ))))
}

/// GET /api/hiring-managers/{id}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Note>>>> {
    let id: HiringManagerId = parse_id(&id)?;
    let notes = state.hiring_manager_service.notes(&actor, id).await?;
    Ok(Json(ApiResponse::ok(notes)))
}

/// POST /api/hiring-managers/{id}/notes
pub async fn add_note(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<CreateNote>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Note>>)> {
    let id: HiringManagerId = parse_id(&id)?;
    let note = state.hiring_manager_service.add_note(&actor, id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(note))))
}

/// GET /api/hiring-managers/{id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Document>>>> {
    let id: HiringManagerId = parse_id(&id)?;
    let documents = state.hiring_manager_service.documents(&actor, id).await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// GET /api/hiring-managers/{id}/transfers
///
/// Transfers where the hiring manager is either the source or the target.
pub async fn list_transfers(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<HiringManagerTransfer>>>> {
    let id: HiringManagerId = parse_id(&id)?;
    // visibility check on the hiring manager itself
    state.hiring_manager_service.get(&actor, id).await?;
    let transfers = state.transfer_service.list_for_hiring_manager(id).await?;
    Ok(Json(ApiResponse::ok(transfers)))
}
