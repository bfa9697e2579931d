//! Organization CRUD, notes, and history handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::note::{CreateNote, HistoryEntry, Note};
use staffhub_entity::organization::{CreateOrganization, Organization, UpdateOrganization};
use uuid::Uuid;

use crate::dto::request::OrganizationQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/organizations?search=&page=&per_page=
pub async fn list_organizations(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<OrganizationQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Organization>>>> {
    let orgs = state
        .organization_service
        .list(&actor, query.search.as_deref(), page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(orgs)))
}

/// POST /api/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateOrganization>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Organization>>)> {
    let org = state.organization_service.create(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(org))))
}

/// GET /api/organizations/{id}
pub async fn get_organization(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Organization>>> {
    let id: Uuid = parse_id(&id)?;
    let org = state.organization_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// PUT /api/organizations/{id}
pub async fn update_organization(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrganization>,
) -> ApiResult<Json<ApiResponse<Organization>>> {
    let id: Uuid = parse_id(&id)?;
    let org = state.organization_service.update(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// DELETE /api/organizations/{id}
pub async fn delete_organization(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: Uuid = parse_id(&id)?;
    state.organization_service.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Organization deleted",
    ))))
}

/// GET /api/organizations/{id}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Note>>>> {
    let id: Uuid = parse_id(&id)?;
    let notes = state.organization_service.notes(&actor, id).await?;
    Ok(Json(ApiResponse::ok(notes)))
}

/// POST /api/organizations/{id}/notes
pub async fn add_note(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<CreateNote>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Note>>)> {
    let id: Uuid = parse_id(&id)?;
    let note = state.organization_service.add_note(&actor, id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(note))))
}

/// GET /api/organizations/{id}/history
pub async fn history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<HistoryEntry>>>> {
    let id: Uuid = parse_id(&id)?;
    let entries = state.organization_service.history(&actor, id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
