//! Hiring manager transfer repository: request rows, the conditional
//! status transitions, and the data migration transaction.

use sqlx::{PgConnection, PgPool};

use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_core::types::{HiringManagerId, TransferId, UserId};
use staffhub_entity::document::ENTITY_TYPE_HIRING_MANAGER;
use staffhub_entity::hiring_manager::HiringManager;
use staffhub_entity::hiring_manager::model::STATUS_ARCHIVED;
use staffhub_entity::note::{NOTE_TYPE_TRANSFER, NoteTarget};
use staffhub_entity::scheduled_task::CreateScheduledTask;
use staffhub_entity::transfer::{HiringManagerTransfer, MigrationSummary, TransferStatus};

use crate::error::{self, DbOperation, db_error};

use super::note::insert_note;
use super::scheduled_task::insert_scheduled_task;

/// Repository for `hiring_manager_transfers` and the migration it drives.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    /// Create a new transfer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a transfer by ID.
    pub async fn find_by_id(&self, id: TransferId) -> AppResult<Option<HiringManagerTransfer>> {
        sqlx::query_as::<_, HiringManagerTransfer>(
            "SELECT * FROM hiring_manager_transfers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to find transfer"))
    }

    /// List transfers, newest first, optionally by status.
    pub async fn find_all(
        &self,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HiringManagerTransfer>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM hiring_manager_transfers \
             WHERE ($1::transfer_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to count transfers"))?;

        let items = sqlx::query_as::<_, HiringManagerTransfer>(
            "SELECT * FROM hiring_manager_transfers \
             WHERE ($1::transfer_status IS NULL OR status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list transfers"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Transfers in which a hiring manager is either side, newest first.
    pub async fn find_for_hiring_manager(
        &self,
        id: HiringManagerId,
    ) -> AppResult<Vec<HiringManagerTransfer>> {
        sqlx::query_as::<_, HiringManagerTransfer>(
            "SELECT * FROM hiring_manager_transfers \
             WHERE source_hiring_manager_id = $1 OR target_hiring_manager_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list hiring manager transfers"))
    }

    /// Persist a new pending transfer.
    pub async fn create(
        &self,
        source: HiringManagerId,
        target: HiringManagerId,
        requested_by: UserId,
    ) -> AppResult<HiringManagerTransfer> {
        sqlx::query_as::<_, HiringManagerTransfer>(
            "INSERT INTO hiring_manager_transfers \
                (source_hiring_manager_id, target_hiring_manager_id, requested_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(source)
        .bind(target)
        .bind(requested_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to create transfer"))
    }

    /// Move a pending transfer to `approved`.
    ///
    /// Returns `None` when no pending row matched, either because the
    /// transfer does not exist or because it was already processed.
    pub async fn approve(
        &self,
        id: TransferId,
        approver: UserId,
    ) -> AppResult<Option<HiringManagerTransfer>> {
        sqlx::query_as::<_, HiringManagerTransfer>(
            "UPDATE hiring_manager_transfers SET status = 'approved', approved_by = $2, \
             approved_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(approver)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to approve transfer"))
    }

    /// Move a pending transfer to `denied`. Same `None` contract as [`Self::approve`].
    pub async fn deny(
        &self,
        id: TransferId,
        denier: UserId,
        reason: &str,
    ) -> AppResult<Option<HiringManagerTransfer>> {
        sqlx::query_as::<_, HiringManagerTransfer>(
            "UPDATE hiring_manager_transfers SET status = 'denied', denied_by = $2, \
             denied_at = NOW(), denial_reason = $3, updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(denier)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to deny transfer"))
    }

    /// Migrate everything owned by `source` onto `target` in one transaction.
    ///
    /// Reassigns notes, documents, and tasks; rewrites the hiring manager
    /// name on the source organization's job postings; writes an audit
    /// note on both sides; archives the source; and schedules the deferred
    /// cleanup. Any failure rolls back every step.
    pub async fn migrate(
        &self,
        transfer: &HiringManagerTransfer,
        source: &HiringManager,
        target: &HiringManager,
        performed_by: UserId,
        cleanup: &CreateScheduledTask,
    ) -> AppResult<MigrationSummary> {
        let mut tx = error::begin(&self.pool).await?;

        let mut summary = move_owned_records(&mut tx, source.id, target.id, false).await?;

        let source_name = source.full_name();
        let target_name = target.full_name();
        summary.jobs_updated = sqlx::query(
            "UPDATE jobs SET hiring_manager = $1, updated_at = NOW() \
             WHERE organization_id = $2 AND LOWER(TRIM(hiring_manager)) = LOWER($3)",
        )
        .bind(&target_name)
        .bind(source.organization_id)
        .bind(&source_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to update job postings"))?
        .rows_affected();

        insert_note(
            &mut tx,
            NoteTarget::HiringManager,
            source.id.into_uuid(),
            NOTE_TYPE_TRANSFER,
            &format!(
                "Transferred to {target_name} (transfer {}). Moved {} notes, {} documents, {} tasks, {} job postings.",
                transfer.id,
                summary.notes_moved,
                summary.documents_moved,
                summary.tasks_moved,
                summary.jobs_updated
            ),
            Some(performed_by),
        )
        .await?;
        insert_note(
            &mut tx,
            NoteTarget::HiringManager,
            target.id.into_uuid(),
            NOTE_TYPE_TRANSFER,
            &format!("Received records from {source_name} (transfer {}).", transfer.id),
            Some(performed_by),
        )
        .await?;

        sqlx::query("UPDATE hiring_managers SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(source.id)
            .bind(STATUS_ARCHIVED)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error(e, DbOperation::Update, "Failed to archive hiring manager"))?;

        let scheduled = insert_scheduled_task(&mut tx, cleanup).await?;
        summary.cleanup_task_id = Some(scheduled.id);

        error::commit(tx).await?;
        Ok(summary)
    }

    /// Move records that were attached to an archived source after its
    /// migration, leaving transfer audit notes where they are.
    pub async fn sweep_stragglers(
        &self,
        transfer_id: TransferId,
        source: HiringManagerId,
        target: HiringManagerId,
    ) -> AppResult<MigrationSummary> {
        let mut tx = error::begin(&self.pool).await?;

        let summary = move_owned_records(&mut tx, source, target, true).await?;

        insert_note(
            &mut tx,
            NoteTarget::HiringManager,
            source.into_uuid(),
            NOTE_TYPE_TRANSFER,
            &format!(
                "Transfer {transfer_id} cleanup moved {} notes, {} documents, {} tasks.",
                summary.notes_moved, summary.documents_moved, summary.tasks_moved
            ),
            None,
        )
        .await?;

        error::commit(tx).await?;
        Ok(summary)
    }
}

async fn move_owned_records(
    conn: &mut PgConnection,
    source: HiringManagerId,
    target: HiringManagerId,
    keep_transfer_notes: bool,
) -> AppResult<MigrationSummary> {
    let notes_moved = sqlx::query(
        "UPDATE hiring_manager_notes SET hiring_manager_id = $2 \
         WHERE hiring_manager_id = $1 AND (NOT $3 OR note_type <> $4)",
    )
    .bind(source)
    .bind(target)
    .bind(keep_transfer_notes)
    .bind(NOTE_TYPE_TRANSFER)
    .execute(&mut *conn)
    .await
    .map_err(|e| db_error(e, DbOperation::Update, "Failed to move hiring manager notes"))?
    .rows_affected();

    let documents_moved = sqlx::query(
        "UPDATE documents SET entity_id = $2 WHERE entity_type = $3 AND entity_id = $1",
    )
    .bind(source)
    .bind(target)
    .bind(ENTITY_TYPE_HIRING_MANAGER)
    .execute(&mut *conn)
    .await
    .map_err(|e| db_error(e, DbOperation::Update, "Failed to move documents"))?
    .rows_affected();

    let tasks_moved = sqlx::query(
        "UPDATE tasks SET hiring_manager_id = $2, updated_at = NOW() WHERE hiring_manager_id = $1",
    )
    .bind(source)
    .bind(target)
    .execute(&mut *conn)
    .await
    .map_err(|e| db_error(e, DbOperation::Update, "Failed to move tasks"))?
    .rows_affected();

    Ok(MigrationSummary {
        notes_moved,
        documents_moved,
        tasks_moved,
        ..Default::default()
    })
}
