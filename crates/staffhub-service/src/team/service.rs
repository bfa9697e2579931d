//! Team CRUD and membership management.
//!
//! A team is visible to its creator, its members, and managers. Only the
//! creator or a manager may change it.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::types::UserId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::{TeamRepository, UserRepository};
use staffhub_entity::team::model::MEMBER_ROLE_MEMBER;
use staffhub_entity::team::{AddTeamMember, CreateTeam, Team, TeamMember, UpdateTeam};

use crate::context::RequestContext;

/// Handles team use cases.
#[derive(Debug, Clone)]
pub struct TeamService {
    teams: Arc<TeamRepository>,
    users: Arc<UserRepository>,
}

impl TeamService {
    /// Creates a new team service.
    pub fn new(teams: Arc<TeamRepository>, users: Arc<UserRepository>) -> Self {
        Self { teams, users }
    }

    /// Lists teams the caller created or belongs to (all teams for managers).
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Team>, AppError> {
        self.teams.find_all(ctx.visibility_scope(), &page).await
    }

    /// Gets a team the caller may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Team, AppError> {
        let team = self.find(id).await?;
        if ctx.can_access(&[team.created_by]) || self.teams.is_member(id, ctx.user_id).await? {
            Ok(team)
        } else {
            Err(AppError::authorization("You do not have access to this team"))
        }
    }

    /// Creates a team owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: CreateTeam) -> Result<Team, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Team name is required"));
        }
        let team = self.teams.create(&input, ctx.user_id).await?;
        info!(team_id = %team.id, user_id = %ctx.user_id, "Team created");
        Ok(team)
    }

    /// Updates a team's name or description.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateTeam,
    ) -> Result<Team, AppError> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Team name cannot be empty"));
        }
        self.ensure_owner(ctx, id).await?;
        self.teams
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Team not found"))
    }

    /// Deletes a team.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.ensure_owner(ctx, id).await?;
        if !self.teams.delete(id).await? {
            return Err(AppError::not_found("Team not found"));
        }
        info!(team_id = %id, user_id = %ctx.user_id, "Team deleted");
        Ok(())
    }

    /// Lists the members of a team.
    pub async fn members(&self, ctx: &RequestContext, id: Uuid) -> Result<Vec<TeamMember>, AppError> {
        self.get(ctx, id).await?;
        self.teams.members(id).await
    }

    /// Adds a user to a team and returns the updated member list.
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: AddTeamMember,
    ) -> Result<Vec<TeamMember>, AppError> {
        self.ensure_owner(ctx, id).await?;
        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }
        let role = input
            .member_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(MEMBER_ROLE_MEMBER);

        self.teams.add_member(id, input.user_id, role).await?;
        info!(team_id = %id, member = %input.user_id, role, "Team member added");
        self.teams.members(id).await
    }

    /// Removes a user from a team.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        user_id: UserId,
    ) -> Result<(), AppError> {
        self.ensure_owner(ctx, id).await?;
        if !self.teams.remove_member(id, user_id).await? {
            return Err(AppError::not_found("User is not a member of this team"));
        }
        info!(team_id = %id, member = %user_id, "Team member removed");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Team, AppError> {
        self.teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Team not found"))
    }

    async fn ensure_owner(&self, ctx: &RequestContext, id: Uuid) -> Result<Team, AppError> {
        let team = self.find(id).await?;
        if ctx.can_access(&[team.created_by]) {
            Ok(team)
        } else {
            Err(AppError::authorization(
                "Only the team creator or a manager can modify this team",
            ))
        }
    }
}
