//! Request DTOs with validation, plus list query parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use staffhub_entity::team::CreateTeam;
use staffhub_entity::transfer::TransferStatus;
use staffhub_entity::user::{CreateUser, UpdateUser, UserRole};

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Role, defaults to recruiter.
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
        }
    }
}

/// Update user request (admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New name.
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// New email.
    #[serde(default)]
    #[validate(email(message = "Must be a valid email address"))]
    pub email: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Activate or deactivate.
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
            is_active: req.is_active,
        }
    }
}

/// Create team request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name.
    #[validate(length(min = 1, max = 200, message = "Team name is required"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<CreateTeamRequest> for CreateTeam {
    fn from(req: CreateTeamRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

/// Organization list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationQuery {
    /// Case-insensitive name search.
    #[serde(default, alias = "q")]
    pub search: Option<String>,
}

/// Hiring manager list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HiringManagerQuery {
    /// Only hiring managers of this organization.
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<Uuid>,
    /// Only hiring managers with this status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Transfer list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferQuery {
    /// Only transfers with this status.
    #[serde(default)]
    pub status: Option<TransferStatus>,
}

/// User list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    /// Only users with this role.
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let ok = CreateUserRequest {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            role: None,
        };
        assert!(ok.validate().is_ok());

        let bad = CreateUserRequest {
            name: String::new(),
            email: "nope".into(),
            role: None,
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_user_skips_absent_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());
        let bad = UpdateUserRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
