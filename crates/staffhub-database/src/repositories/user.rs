//! User repository implementation.

use sqlx::PgPool;

use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;
use staffhub_core::types::UserId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::error::{DbOperation, db_error};

/// Repository for user CRUD.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find user by id"))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find user by email"))
    }

    /// List users with pagination, optionally filtered by role.
    pub async fn find_all(
        &self,
        role: Option<UserRole>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)")
                .bind(role)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, DbOperation::Read, "Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE ($1::user_role IS NULL OR role = $1) \
             ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(role)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list users"))?;

        Ok(PageResponse::new(users, page, total))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(data.role.unwrap_or(UserRole::Recruiter))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!("Email '{}' is already in use", data.email.trim()))
            }
            other => db_error(other, DbOperation::Create, "Failed to create user"),
        })
    }

    /// Apply a partial update. Returns `None` if the user does not exist.
    pub async fn update(&self, id: UserId, data: &UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                role = COALESCE($4, role), \
                is_active = COALESCE($5, is_active), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.email.as_deref().map(str::trim))
        .bind(data.role)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email is already in use")
            }
            other => db_error(other, DbOperation::Update, "Failed to update user"),
        })
    }

    /// Delete a user. Returns `false` if no row was deleted.
    pub async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
