//! Team and team membership handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use staffhub_core::types::UserId;
use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::team::{AddTeamMember, Team, TeamMember, UpdateTeam};

use crate::dto::request::CreateTeamRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    actor: Actor,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Team>>>> {
    let teams = state
        .team_service
        .list(&actor, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(teams)))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Team>>)> {
    req.validate()?;
    let team = state.team_service.create(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(team))))
}

/// GET /api/teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Team>>> {
    let id: Uuid = parse_id(&id)?;
    let team = state.team_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(team)))
}

/// PUT /api/teams/{id}
pub async fn update_team(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeam>,
) -> ApiResult<Json<ApiResponse<Team>>> {
    let id: Uuid = parse_id(&id)?;
    let team = state.team_service.update(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(team)))
}

/// DELETE /api/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: Uuid = parse_id(&id)?;
    state.team_service.delete(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Team deleted"))))
}

/// GET /api/teams/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<TeamMember>>>> {
    let id: Uuid = parse_id(&id)?;
    let members = state.team_service.members(&actor, id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// POST /api/teams/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<AddTeamMember>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<TeamMember>>>)> {
    let id: Uuid = parse_id(&id)?;
    let members = state.team_service.add_member(&actor, id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(members))))
}

/// DELETE /api/teams/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: Uuid = parse_id(&id)?;
    let user_id: UserId = parse_id(&user_id)?;
    state.team_service.remove_member(&actor, id, user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Member removed from team",
    ))))
}
