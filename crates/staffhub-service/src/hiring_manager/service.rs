//! Hiring manager CRUD, notes, and documents.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::types::HiringManagerId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::{
    DocumentRepository, HiringManagerRepository, NoteRepository,
};
use staffhub_entity::custom_fields;
use staffhub_entity::document::{Document, ENTITY_TYPE_HIRING_MANAGER};
use staffhub_entity::hiring_manager::{CreateHiringManager, HiringManager, UpdateHiringManager};
use staffhub_entity::note::{CreateNote, NOTE_TYPE_GENERAL, Note, NoteTarget};

use crate::context::RequestContext;

/// Handles hiring manager use cases.
#[derive(Debug, Clone)]
pub struct HiringManagerService {
    hiring_managers: Arc<HiringManagerRepository>,
    notes: Arc<NoteRepository>,
    documents: Arc<DocumentRepository>,
}

impl HiringManagerService {
    /// Creates a new hiring manager service.
    pub fn new(
        hiring_managers: Arc<HiringManagerRepository>,
        notes: Arc<NoteRepository>,
        documents: Arc<DocumentRepository>,
    ) -> Self {
        Self {
            hiring_managers,
            notes,
            documents,
        }
    }

    /// Lists the hiring managers visible to the caller.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        organization_id: Option<Uuid>,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<HiringManager>, AppError> {
        self.hiring_managers
            .find_all(ctx.visibility_scope(), organization_id, status, &page)
            .await
    }

    /// Gets a hiring manager the caller may see.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: HiringManagerId,
    ) -> Result<HiringManager, AppError> {
        let hm = self
            .hiring_managers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hiring manager not found"))?;
        ctx.ensure_access(&[hm.created_by], "hiring manager")?;
        Ok(hm)
    }

    /// Creates a hiring manager owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateHiringManager,
    ) -> Result<HiringManager, AppError> {
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(AppError::validation(
                "Hiring manager first and last name are required",
            ));
        }
        let fields = custom_fields::normalize(input.custom_fields.clone())?;

        let hm = self.hiring_managers.create(&input, fields, ctx.user_id).await?;
        info!(hiring_manager_id = %hm.id, user_id = %ctx.user_id, "Hiring manager created");
        Ok(hm)
    }

    /// Updates a hiring manager, merging custom fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: HiringManagerId,
        input: UpdateHiringManager,
    ) -> Result<HiringManager, AppError> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&input.first_name) || blank(&input.last_name) {
            return Err(AppError::validation("Hiring manager name cannot be empty"));
        }
        self.get(ctx, id).await?;

        self.hiring_managers
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Hiring manager not found"))
    }

    /// Deletes a hiring manager.
    pub async fn delete(&self, ctx: &RequestContext, id: HiringManagerId) -> Result<(), AppError> {
        self.get(ctx, id).await?;
        if !self.hiring_managers.delete(id).await? {
            return Err(AppError::not_found("Hiring manager not found"));
        }
        info!(hiring_manager_id = %id, user_id = %ctx.user_id, "Hiring manager deleted");
        Ok(())
    }

    /// Lists notes on a hiring manager.
    pub async fn notes(
        &self,
        ctx: &RequestContext,
        id: HiringManagerId,
    ) -> Result<Vec<Note>, AppError> {
        self.get(ctx, id).await?;
        self.notes
            .list(NoteTarget::HiringManager, id.into_uuid())
            .await
    }

    /// Adds a note to a hiring manager.
    pub async fn add_note(
        &self,
        ctx: &RequestContext,
        id: HiringManagerId,
        input: CreateNote,
    ) -> Result<Note, AppError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Note text is required"));
        }
        self.get(ctx, id).await?;
        let note_type = input.note_type.as_deref().unwrap_or(NOTE_TYPE_GENERAL);
        self.notes
            .create(
                NoteTarget::HiringManager,
                id.into_uuid(),
                note_type,
                text,
                Some(ctx.user_id),
            )
            .await
    }

    /// Lists documents attached to a hiring manager.
    pub async fn documents(
        &self,
        ctx: &RequestContext,
        id: HiringManagerId,
    ) -> Result<Vec<Document>, AppError> {
        self.get(ctx, id).await?;
        self.documents
            .list_for_entity(ENTITY_TYPE_HIRING_MANAGER, id.into_uuid())
            .await
    }
}
