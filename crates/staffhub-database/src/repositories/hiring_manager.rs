//! Hiring manager repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_core::types::{HiringManagerId, UserId};
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::custom_fields;
use staffhub_entity::hiring_manager::model::STATUS_ACTIVE;
use staffhub_entity::hiring_manager::{CreateHiringManager, HiringManager, UpdateHiringManager};

use crate::error::{self, DbOperation, db_error};

/// Repository for hiring managers.
#[derive(Debug, Clone)]
pub struct HiringManagerRepository {
    pool: PgPool,
}

impl HiringManagerRepository {
    /// Create a new hiring manager repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a hiring manager by ID.
    pub async fn find_by_id(&self, id: HiringManagerId) -> AppResult<Option<HiringManager>> {
        sqlx::query_as::<_, HiringManager>("SELECT * FROM hiring_managers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find hiring manager"))
    }

    /// List hiring managers, optionally by creator, organization, and status.
    pub async fn find_all(
        &self,
        owner: Option<UserId>,
        organization_id: Option<Uuid>,
        status: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HiringManager>> {
        const FILTER: &str = "($1::uuid IS NULL OR created_by = $1) \
             AND ($2::uuid IS NULL OR organization_id = $2) \
             AND ($3::text IS NULL OR LOWER(status) = LOWER($3))";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM hiring_managers WHERE {FILTER}"))
                .bind(owner)
                .bind(organization_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, DbOperation::Read, "Failed to count hiring managers"))?;

        let items = sqlx::query_as::<_, HiringManager>(&format!(
            "SELECT * FROM hiring_managers WHERE {FILTER} \
             ORDER BY last_name ASC, first_name ASC LIMIT $4 OFFSET $5"
        ))
        .bind(owner)
        .bind(organization_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list hiring managers"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Create a hiring manager.
    pub async fn create(
        &self,
        data: &CreateHiringManager,
        custom_fields: serde_json::Value,
        created_by: UserId,
    ) -> AppResult<HiringManager> {
        sqlx::query_as::<_, HiringManager>(
            "INSERT INTO hiring_managers \
                (first_name, last_name, email, phone, title, organization_id, status, custom_fields, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(data.first_name.trim())
        .bind(data.last_name.trim())
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.title)
        .bind(data.organization_id)
        .bind(data.status.as_deref().unwrap_or(STATUS_ACTIVE))
        .bind(&custom_fields)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to create hiring manager"))
    }

    /// Apply a partial update, shallow-merging custom fields under a row lock.
    pub async fn update(
        &self,
        id: HiringManagerId,
        data: &UpdateHiringManager,
    ) -> AppResult<Option<HiringManager>> {
        let mut tx = error::begin(&self.pool).await?;

        let existing = sqlx::query_as::<_, HiringManager>(
            "SELECT * FROM hiring_managers WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to lock hiring manager"))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = match &data.custom_fields {
            Some(patch) => custom_fields::merge(Some(&existing.custom_fields), patch)?,
            None => existing.custom_fields.clone(),
        };

        let hm = sqlx::query_as::<_, HiringManager>(
            "UPDATE hiring_managers SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                title = COALESCE($6, title), \
                organization_id = COALESCE($7, organization_id), \
                status = COALESCE($8, status), \
                custom_fields = $9, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.first_name.as_deref().map(str::trim))
        .bind(data.last_name.as_deref().map(str::trim))
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.title)
        .bind(data.organization_id)
        .bind(&data.status)
        .bind(&merged)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to update hiring manager"))?;

        error::commit(tx).await?;
        Ok(Some(hm))
    }

    /// Delete a hiring manager along with its notes and transfers.
    pub async fn delete(&self, id: HiringManagerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM hiring_managers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to delete hiring manager"))?;
        Ok(result.rows_affected() > 0)
    }
}
