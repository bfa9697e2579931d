//! Organization CRUD, notes, and history with owner-based visibility.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::{NoteRepository, OrganizationRepository};
use staffhub_entity::custom_fields;
use staffhub_entity::note::{CreateNote, HistoryEntry, NOTE_TYPE_GENERAL, Note, NoteTarget};
use staffhub_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

use crate::context::RequestContext;

/// Handles organization use cases.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    orgs: Arc<OrganizationRepository>,
    notes: Arc<NoteRepository>,
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(orgs: Arc<OrganizationRepository>, notes: Arc<NoteRepository>) -> Self {
        Self { orgs, notes }
    }

    /// Lists the organizations visible to the caller.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<Organization>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.orgs
            .find_all(ctx.visibility_scope(), search, &page)
            .await
    }

    /// Gets an organization the caller may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Organization, AppError> {
        let org = self
            .orgs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;
        ctx.ensure_access(&[org.created_by], "organization")?;
        Ok(org)
    }

    /// Creates an organization owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateOrganization,
    ) -> Result<Organization, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Organization name is required"));
        }
        let fields = custom_fields::normalize(input.custom_fields.clone())?;

        let org = self.orgs.create(&input, fields, ctx.user_id).await?;
        info!(organization_id = %org.id, user_id = %ctx.user_id, "Organization created");
        Ok(org)
    }

    /// Updates an organization, merging custom fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateOrganization,
    ) -> Result<Organization, AppError> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Organization name cannot be empty"));
        }
        self.get(ctx, id).await?;

        self.orgs
            .update(id, &input, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    /// Deletes an organization.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.get(ctx, id).await?;
        if !self.orgs.delete(id).await? {
            return Err(AppError::not_found("Organization not found"));
        }
        info!(organization_id = %id, user_id = %ctx.user_id, "Organization deleted");
        Ok(())
    }

    /// Lists notes on an organization.
    pub async fn notes(&self, ctx: &RequestContext, id: Uuid) -> Result<Vec<Note>, AppError> {
        self.get(ctx, id).await?;
        self.notes.list(NoteTarget::Organization, id).await
    }

    /// Adds a note to an organization.
    pub async fn add_note(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: CreateNote,
    ) -> Result<Note, AppError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Note text is required"));
        }
        self.get(ctx, id).await?;
        let note_type = input.note_type.as_deref().unwrap_or(NOTE_TYPE_GENERAL);
        self.notes
            .create(NoteTarget::Organization, id, note_type, text, Some(ctx.user_id))
            .await
    }

    /// Lists the history of an organization.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        self.get(ctx, id).await?;
        self.notes.history(NoteTarget::Organization, id).await
    }
}
