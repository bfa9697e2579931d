//! User directory and admin user-management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use staffhub_core::types::UserId;
use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::user::User;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::middleware::rbac;
use crate::state::AppState;

/// GET /api/users?role=
pub async fn list_users(
    State(state): State<AppState>,
    _actor: Actor,
    Query(query): Query<UserQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let users = state
        .user_service
        .list(query.role, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    rbac::require_admin(&actor)?;
    req.validate()?;
    let user = state.user_service.create(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let id: UserId = parse_id(&id)?;
    let user = state.user_service.get(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    rbac::require_admin(&actor)?;
    req.validate()?;
    let id: UserId = parse_id(&id)?;
    let user = state.user_service.update(&actor, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    rbac::require_admin(&actor)?;
    let id: UserId = parse_id(&id)?;
    state.user_service.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
