//! Team and membership repository.

use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;
use staffhub_core::types::UserId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::team::{CreateTeam, Team, TeamMember, UpdateTeam};

use crate::error::{DbOperation, db_error};

/// Repository for teams and `team_members`.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Create a new team repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find team"))
    }

    /// List teams. With `member` set, only teams that user created or belongs to.
    pub async fn find_all(
        &self,
        member: Option<UserId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Team>> {
        const FILTER: &str = "($1::uuid IS NULL OR t.created_by = $1 OR EXISTS ( \
             SELECT 1 FROM team_members m WHERE m.team_id = t.id AND m.user_id = $1))";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM teams t WHERE {FILTER}"))
            .bind(member)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to count teams"))?;

        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT t.* FROM teams t WHERE {FILTER} ORDER BY t.name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(member)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list teams"))?;

        Ok(PageResponse::new(teams, page, total))
    }

    /// Create a team.
    pub async fn create(&self, data: &CreateTeam, created_by: UserId) -> AppResult<Team> {
        sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, description, created_by) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to create team"))
    }

    /// Apply a partial update. Returns `None` if the team does not exist.
    pub async fn update(&self, id: Uuid, data: &UpdateTeam) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>(
            "UPDATE teams SET name = COALESCE($2, name), description = COALESCE($3, description), \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to update team"))
    }

    /// Delete a team and its memberships.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to delete team"))?;
        Ok(result.rows_affected() > 0)
    }

    /// List the members of a team.
    pub async fn members(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT m.team_id, m.user_id, m.member_role, u.name, u.email, m.joined_at \
             FROM team_members m JOIN users u ON u.id = m.user_id \
             WHERE m.team_id = $1 ORDER BY u.name ASC",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list team members"))
    }

    /// Check whether a user belongs to a team.
    pub async fn is_member(&self, team_id: Uuid, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM team_members WHERE team_id = $1 AND user_id = $2)",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to check team membership"))
    }

    /// Add a user to a team.
    pub async fn add_member(
        &self,
        team_id: Uuid,
        user_id: UserId,
        member_role: &str,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO team_members (team_id, user_id, member_role) VALUES ($1, $2, $3)")
            .bind(team_id)
            .bind(user_id)
            .bind(member_role)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("team_members_pkey") =>
                {
                    AppError::conflict("User is already a member of this team")
                }
                other => db_error(other, DbOperation::Create, "Failed to add team member"),
            })?;
        Ok(())
    }

    /// Remove a user from a team. Returns `false` if they were not a member.
    pub async fn remove_member(&self, team_id: Uuid, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to remove team member"))?;
        Ok(result.rows_affected() > 0)
    }
}
