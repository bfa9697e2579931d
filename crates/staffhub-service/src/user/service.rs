//! User directory. Any actor may read; only admins may change users.

use std::sync::Arc;

use tracing::info;

use staffhub_core::error::AppError;
use staffhub_core::types::UserId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::UserRepository;
use staffhub_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::context::RequestContext;

/// Handles user management.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    /// Lists users, optionally filtered by role.
    pub async fn list(
        &self,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.users.find_all(role, &page).await
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Creates a user.
    pub async fn create(&self, ctx: &RequestContext, input: CreateUser) -> Result<User, AppError> {
        ctx.require_admin("create users")?;
        validate_name(&input.name)?;
        validate_email(&input.email)?;

        let user = self.users.create(&input).await?;
        info!(user_id = %user.id, role = %user.role, created_by = %ctx.user_id, "User created");
        Ok(user)
    }

    /// Updates a user.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: UserId,
        input: UpdateUser,
    ) -> Result<User, AppError> {
        ctx.require_admin("update users")?;
        if let Some(name) = input.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(email) = input.email.as_deref() {
            validate_email(email)?;
        }

        let user = self
            .users
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        info!(user_id = %id, updated_by = %ctx.user_id, "User updated");
        Ok(user)
    }

    /// Deletes a user. Admins cannot delete themselves.
    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), AppError> {
        ctx.require_admin("delete users")?;
        if id == ctx.user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, deleted_by = %ctx.user_id, "User deleted");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("User name is required"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation(format!("Invalid email address: '{email}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ann@example.com").is_ok());
        assert!(validate_email(" ann@example.com ").is_ok());
        assert!(validate_email("ann").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ann@localhost").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ann").is_ok());
        assert!(validate_name("  ").is_err());
    }
}
