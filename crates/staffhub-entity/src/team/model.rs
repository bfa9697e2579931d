//! Team and membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::UserId;

/// Default membership role.
pub const MEMBER_ROLE_MEMBER: &str = "member";

/// A recruiting team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    /// Team ID.
    pub id: Uuid,
    /// Team name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// A member of a team, joined with the user's name and email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    /// Team ID.
    pub team_id: Uuid,
    /// Member user ID.
    pub user_id: UserId,
    /// Role within the team (`member`, `lead`, ...).
    pub member_role: String,
    /// User display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}

/// Data for a new team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeam {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to add a user to a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTeamMember {
    /// User to add.
    #[serde(alias = "userId")]
    pub user_id: UserId,
    /// Role within the team.
    #[serde(default, alias = "memberRole", alias = "role")]
    pub member_role: Option<String>,
}
