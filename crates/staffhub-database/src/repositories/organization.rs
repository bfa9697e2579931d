//! Organization repository implementation.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_core::types::UserId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::custom_fields;
use staffhub_entity::note::NoteTarget;
use staffhub_entity::organization::model::DEFAULT_STATUS;
use staffhub_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

use crate::error::{self, DbOperation, db_error};

use super::note::append_history;

/// Repository for organizations and their history.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organization by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find organization"))
    }

    /// List organizations, optionally restricted to one creator and a name search.
    pub async fn find_all(
        &self,
        owner: Option<UserId>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Organization>> {
        const FILTER: &str = "($1::uuid IS NULL OR created_by = $1) \
             AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM organizations WHERE {FILTER}"))
                .bind(owner)
                .bind(search)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, DbOperation::Read, "Failed to count organizations"))?;

        let items = sqlx::query_as::<_, Organization>(&format!(
            "SELECT * FROM organizations WHERE {FILTER} ORDER BY name ASC LIMIT $3 OFFSET $4"
        ))
        .bind(owner)
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list organizations"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Create an organization and record a `created` history entry.
    pub async fn create(
        &self,
        data: &CreateOrganization,
        custom_fields: serde_json::Value,
        created_by: UserId,
    ) -> AppResult<Organization> {
        let mut tx = error::begin(&self.pool).await?;

        let org = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations \
                (name, industry, website, phone, address, status, custom_fields, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.name.trim())
        .bind(&data.industry)
        .bind(&data.website)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(data.status.as_deref().unwrap_or(DEFAULT_STATUS))
        .bind(&custom_fields)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to create organization"))?;

        append_history(
            &mut tx,
            NoteTarget::Organization,
            org.id,
            "created",
            json!({ "name": org.name }),
            Some(created_by),
        )
        .await?;

        error::commit(tx).await?;
        Ok(org)
    }

    /// Apply a partial update, shallow-merging custom fields under a row
    /// lock, and record an `updated` history entry.
    ///
    /// Returns `None` if the organization does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateOrganization,
        performed_by: UserId,
    ) -> AppResult<Option<Organization>> {
        let mut tx = error::begin(&self.pool).await?;

        let existing = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to lock organization"))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = match &data.custom_fields {
            Some(patch) => custom_fields::merge(Some(&existing.custom_fields), patch)?,
            None => existing.custom_fields.clone(),
        };

        let org = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET \
                name = COALESCE($2, name), \
                industry = COALESCE($3, industry), \
                website = COALESCE($4, website), \
                phone = COALESCE($5, phone), \
                address = COALESCE($6, address), \
                status = COALESCE($7, status), \
                custom_fields = $8, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(&data.industry)
        .bind(&data.website)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.status)
        .bind(&merged)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to update organization"))?;

        append_history(
            &mut tx,
            NoteTarget::Organization,
            id,
            "updated",
            json!({ "fields": data.changed_fields() }),
            Some(performed_by),
        )
        .await?;

        error::commit(tx).await?;
        Ok(Some(org))
    }

    /// Delete an organization. Fails with a conflict while hiring managers
    /// still reference it.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to delete organization"))?;
        Ok(result.rows_affected() > 0)
    }
}
