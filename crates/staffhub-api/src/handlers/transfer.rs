//! Hiring manager transfer request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use staffhub_core::types::TransferId;
use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::transfer::{CreateTransfer, DenyTransfer, HiringManagerTransfer};
use staffhub_service::ApprovedTransfer;

use crate::dto::request::TransferQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/hiring-manager-transfers?status=
pub async fn list_transfers(
    State(state): State<AppState>,
    _actor: Actor,
    Query(query): Query<TransferQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<HiringManagerTransfer>>>> {
    let transfers = state
        .transfer_service
        .list(query.status, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(transfers)))
}

/// POST /api/hiring-manager-transfers
pub async fn create_transfer(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateTransfer>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HiringManagerTransfer>>)> {
    let transfer = state.transfer_service.create(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(transfer))))
}

/// GET /api/hiring-manager-transfers/{id}
pub async fn get_transfer(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<HiringManagerTransfer>>> {
    let id: TransferId = parse_id(&id)?;
    let transfer = state.transfer_service.get(id).await?;
    Ok(Json(ApiResponse::ok(transfer)))
}

/// POST /api/hiring-manager-transfers/{id}/approve
pub async fn approve_transfer(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ApprovedTransfer>>> {
    let id: TransferId = parse_id(&id)?;
    let approved = state.transfer_service.approve(&actor, id).await?;
    Ok(Json(ApiResponse::ok(approved)))
}

/// POST /api/hiring-manager-transfers/{id}/deny
pub async fn deny_transfer(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<DenyTransfer>,
) -> ApiResult<Json<ApiResponse<HiringManagerTransfer>>> {
    let id: TransferId = parse_id(&id)?;
    let transfer = state.transfer_service.deny(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(transfer)))
}
