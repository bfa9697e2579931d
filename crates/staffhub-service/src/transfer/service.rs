//! Transfer requests, decisions, and the approval migration.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use staffhub_core::config::TransferConfig;
use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_core::types::{HiringManagerId, TransferId};
use staffhub_database::repositories::{
    HiringManagerRepository, NoteRepository, TransferRepository,
};
use staffhub_entity::email_template::HIRING_MANAGER_TRANSFER_REQUEST;
use staffhub_entity::hiring_manager::HiringManager;
use staffhub_entity::note::{NOTE_TYPE_TRANSFER, NoteTarget};
use staffhub_entity::scheduled_task::{CreateScheduledTask, ScheduledTaskPayload};
use staffhub_entity::transfer::{
    CreateTransfer, DenyTransfer, HiringManagerTransfer, MigrationSummary, TransferStatus,
};

use crate::context::RequestContext;
use crate::email::EmailService;

use super::notify::{SAFE_KEYS, TRANSFER_REQUEST_FALLBACK, request_vars};

/// Attempts allowed for the deferred cleanup.
const CLEANUP_MAX_ATTEMPTS: i32 = 5;

/// Result of a successful approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedTransfer {
    /// The transfer, now `approved`.
    pub transfer: HiringManagerTransfer,
    /// What the migration moved.
    pub migration: MigrationSummary,
}

/// Orchestrates the hiring manager transfer workflow.
#[derive(Debug, Clone)]
pub struct TransferService {
    transfers: Arc<TransferRepository>,
    hiring_managers: Arc<HiringManagerRepository>,
    notes: Arc<NoteRepository>,
    email: Arc<EmailService>,
    config: TransferConfig,
    public_base_url: String,
}

impl TransferService {
    /// Creates a new transfer service.
    pub fn new(
        transfers: Arc<TransferRepository>,
        hiring_managers: Arc<HiringManagerRepository>,
        notes: Arc<NoteRepository>,
        email: Arc<EmailService>,
        config: TransferConfig,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            transfers,
            hiring_managers,
            notes,
            email,
            config,
            public_base_url: public_base_url.into(),
        }
    }

    /// Gets a transfer by ID.
    pub async fn get(&self, id: TransferId) -> Result<HiringManagerTransfer, AppError> {
        self.transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Transfer request not found"))
    }

    /// Lists transfers, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<TransferStatus>,
        page: PageRequest,
    ) -> Result<PageResponse<HiringManagerTransfer>, AppError> {
        self.transfers.find_all(status, &page).await
    }

    /// Lists the transfers a hiring manager takes part in.
    pub async fn list_for_hiring_manager(
        &self,
        id: HiringManagerId,
    ) -> Result<Vec<HiringManagerTransfer>, AppError> {
        self.load_hiring_manager(id).await?;
        self.transfers.find_for_hiring_manager(id).await
    }

    /// Records a pending transfer and notifies payroll.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateTransfer,
    ) -> Result<HiringManagerTransfer, AppError> {
        let (source_id, target_id) = validate_request(&input)?;

        let source = self.load_hiring_manager(source_id).await?;
        let target = self.load_hiring_manager(target_id).await?;
        if source.is_archived() {
            return Err(AppError::validation(
                "Source hiring manager has already been archived",
            ));
        }

        let transfer = self
            .transfers
            .create(source_id, target_id, ctx.user_id)
            .await?;
        info!(
            transfer_id = %transfer.id,
            source = %source_id,
            target = %target_id,
            requested_by = %ctx.user_id,
            "Hiring manager transfer requested"
        );

        self.notify_payroll(&transfer, &source, &target).await;
        Ok(transfer)
    }

    /// Approves a pending transfer and migrates the source's records.
    ///
    /// The status change commits before the migration runs. A failed
    /// migration leaves an approved transfer behind and is reported as an
    /// internal error.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        id: TransferId,
    ) -> Result<ApprovedTransfer, AppError> {
        ctx.require_manager("approve transfer requests")?;

        let transfer = match self.transfers.approve(id, ctx.user_id).await? {
            Some(transfer) => transfer,
            None => return Err(self.not_pending(id).await),
        };

        let source = self
            .load_hiring_manager(transfer.source_hiring_manager_id)
            .await?;
        let target = self
            .load_hiring_manager(transfer.target_hiring_manager_id)
            .await?;
        let cleanup = self.cleanup_task(&transfer)?;

        let migration = self
            .transfers
            .migrate(&transfer, &source, &target, ctx.user_id, &cleanup)
            .await
            .map_err(|e| {
                error!(
                    transfer_id = %id,
                    error = %e,
                    "Transfer approved but data migration failed"
                );
                AppError::internal(format!("Failed to migrate hiring manager data: {}", e.message))
            })?;

        info!(
            transfer_id = %id,
            approved_by = %ctx.user_id,
            notes = migration.notes_moved,
            documents = migration.documents_moved,
            tasks = migration.tasks_moved,
            jobs = migration.jobs_updated,
            "Hiring manager transfer approved"
        );
        Ok(ApprovedTransfer {
            transfer,
            migration,
        })
    }

    /// Denies a pending transfer with a reason.
    pub async fn deny(
        &self,
        ctx: &RequestContext,
        id: TransferId,
        input: DenyTransfer,
    ) -> Result<HiringManagerTransfer, AppError> {
        ctx.require_manager("deny transfer requests")?;
        let reason = validate_denial(&input)?;

        let transfer = match self.transfers.deny(id, ctx.user_id, &reason).await? {
            Some(transfer) => transfer,
            None => return Err(self.not_pending(id).await),
        };
        info!(transfer_id = %id, denied_by = %ctx.user_id, "Hiring manager transfer denied");

        let text = format!("Transfer request {id} was denied: {reason}");
        for hm in [
            transfer.source_hiring_manager_id,
            transfer.target_hiring_manager_id,
        ] {
            if let Err(e) = self
                .notes
                .create(
                    NoteTarget::HiringManager,
                    hm.into_uuid(),
                    NOTE_TYPE_TRANSFER,
                    &text,
                    Some(ctx.user_id),
                )
                .await
            {
                warn!(transfer_id = %id, hiring_manager_id = %hm, error = %e, "Failed to add denial note");
            }
        }
        Ok(transfer)
    }

    /// Deferred cleanup: move records attached to the archived source after
    /// the migration. Transfers that are not approved are skipped.
    pub async fn run_cleanup(
        &self,
        transfer_id: TransferId,
        source: HiringManagerId,
        target: HiringManagerId,
    ) -> Result<Option<MigrationSummary>, AppError> {
        let Some(transfer) = self.transfers.find_by_id(transfer_id).await? else {
            warn!(transfer_id = %transfer_id, "Cleanup skipped, transfer no longer exists");
            return Ok(None);
        };
        if transfer.status != TransferStatus::Approved {
            warn!(
                transfer_id = %transfer_id,
                status = %transfer.status,
                "Cleanup skipped, transfer is not approved"
            );
            return Ok(None);
        }

        let summary = self
            .transfers
            .sweep_stragglers(transfer_id, source, target)
            .await?;
        info!(
            transfer_id = %transfer_id,
            notes = summary.notes_moved,
            documents = summary.documents_moved,
            tasks = summary.tasks_moved,
            "Transfer cleanup finished"
        );
        Ok(Some(summary))
    }

    async fn load_hiring_manager(&self, id: HiringManagerId) -> Result<HiringManager, AppError> {
        self.hiring_managers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Hiring manager {id} not found")))
    }

    /// Distinguish a missing transfer from one that was already decided.
    async fn not_pending(&self, id: TransferId) -> AppError {
        match self.transfers.find_by_id(id).await {
            Ok(Some(_)) => AppError::conflict("Transfer request has already been processed"),
            Ok(None) => AppError::not_found("Transfer request not found"),
            Err(e) => e,
        }
    }

    fn cleanup_task(
        &self,
        transfer: &HiringManagerTransfer,
    ) -> Result<CreateScheduledTask, AppError> {
        let payload = ScheduledTaskPayload::TransferCleanup {
            transfer_id: transfer.id,
            source_hiring_manager_id: transfer.source_hiring_manager_id,
            target_hiring_manager_id: transfer.target_hiring_manager_id,
        };
        Ok(CreateScheduledTask {
            task_type: payload.task_type().to_string(),
            payload: payload.to_json()?,
            scheduled_for: Utc::now() + Duration::days(self.config.cleanup_delay_days.max(0)),
            max_attempts: CLEANUP_MAX_ATTEMPTS,
        })
    }

    async fn notify_payroll(
        &self,
        transfer: &HiringManagerTransfer,
        source: &HiringManager,
        target: &HiringManager,
    ) {
        let Some(payroll) = self
            .config
            .payroll_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return;
        };

        let vars = request_vars(transfer, source, target, &self.public_base_url);
        let message = self
            .email
            .render(
                HIRING_MANAGER_TRANSFER_REQUEST,
                &TRANSFER_REQUEST_FALLBACK,
                &vars,
                SAFE_KEYS,
            )
            .await
            .to(vec![payroll.to_string()]);
        if let Err(e) = self.email.send(&message).await {
            warn!(transfer_id = %transfer.id, error = %e, "Failed to send transfer notification");
        }
    }
}

/// Check a transfer request before any lookups.
pub fn validate_request(
    input: &CreateTransfer,
) -> Result<(HiringManagerId, HiringManagerId), AppError> {
    let (Some(source), Some(target)) = (
        input.source_hiring_manager_id,
        input.target_hiring_manager_id,
    ) else {
        return Err(AppError::validation(
            "Source and target hiring manager IDs are required",
        ));
    };
    if source == target {
        return Err(AppError::validation(
            "Source and target hiring managers must be different",
        ));
    }
    Ok((source, target))
}

/// Trimmed, non-empty denial reason.
pub fn validate_denial(input: &DenyTransfer) -> Result<String, AppError> {
    input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("A denial reason is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_core::error::ErrorKind;

    #[test]
    fn test_validate_request_requires_both_ids() {
        let err = validate_request(&CreateTransfer {
            source_hiring_manager_id: Some(HiringManagerId::new()),
            target_hiring_manager_id: None,
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_validate_request_rejects_same_manager() {
        let id = HiringManagerId::new();
        let err = validate_request(&CreateTransfer {
            source_hiring_manager_id: Some(id),
            target_hiring_manager_id: Some(id),
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("different"));
    }

    #[test]
    fn test_validate_request_accepts_distinct_ids() {
        let (source, target) = (HiringManagerId::new(), HiringManagerId::new());
        let ids = validate_request(&CreateTransfer {
            source_hiring_manager_id: Some(source),
            target_hiring_manager_id: Some(target),
        })
        .unwrap();
        assert_eq!(ids, (source, target));
    }

    #[test]
    fn test_validate_denial_trims_reason() {
        let reason = validate_denial(&DenyTransfer {
            reason: Some("  duplicate request ".into()),
        })
        .unwrap();
        assert_eq!(reason, "duplicate request");

        for blank in [None, Some(String::new()), Some("   ".into())] {
            let err = validate_denial(&DenyTransfer { reason: blank }).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }
}
