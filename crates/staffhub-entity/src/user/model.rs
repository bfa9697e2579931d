//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staffhub_core::types::UserId;

use super::role::UserRole;

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Role.
    pub role: UserRole,
    /// Deactivated users keep their rows but receive no email.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role; defaults to `recruiter`.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Partial update of a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Activate or deactivate.
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
}
