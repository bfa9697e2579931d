//! `scheduled_tasks` queue repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::scheduled_task::{CreateScheduledTask, ScheduledTask, ScheduledTaskStatus};

use crate::error::{DbOperation, db_error};

/// Repository for deferred work rows.
#[derive(Debug, Clone)]
pub struct ScheduledTaskRepository {
    pool: PgPool,
}

impl ScheduledTaskRepository {
    /// Create a new scheduled task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a scheduled task by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ScheduledTask>> {
        sqlx::query_as::<_, ScheduledTask>("SELECT * FROM scheduled_tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find scheduled task"))
    }

    /// List scheduled tasks, newest first, optionally by status.
    pub async fn find_all(
        &self,
        status: Option<ScheduledTaskStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ScheduledTask>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scheduled_tasks \
             WHERE ($1::scheduled_task_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to count scheduled tasks"))?;

        let items = sqlx::query_as::<_, ScheduledTask>(
            "SELECT * FROM scheduled_tasks \
             WHERE ($1::scheduled_task_status IS NULL OR status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list scheduled tasks"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Row counts per status.
    pub async fn count_by_status(&self) -> AppResult<Vec<(ScheduledTaskStatus, i64)>> {
        sqlx::query_as::<_, (ScheduledTaskStatus, i64)>(
            "SELECT status, COUNT(*) FROM scheduled_tasks GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to count scheduled tasks"))
    }

    /// Whether a pending or running task of this type already exists.
    pub async fn has_active(&self, task_type: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM scheduled_tasks \
             WHERE task_type = $1 AND status IN ('pending', 'running'))",
        )
        .bind(task_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to check scheduled tasks"))
    }

    /// Insert a new scheduled task.
    pub async fn create(&self, data: &CreateScheduledTask) -> AppResult<ScheduledTask> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error(e, DbOperation::Create, "Failed to acquire connection"))?;
        insert_scheduled_task(&mut conn, data).await
    }

    /// Claim the next due task (SKIP LOCKED so concurrent workers never
    /// claim the same row).
    pub async fn claim_next(&self, worker_id: &str) -> AppResult<Option<ScheduledTask>> {
        sqlx::query_as::<_, ScheduledTask>(
            "UPDATE scheduled_tasks SET status = 'running', started_at = NOW(), worker_id = $1, \
             attempts = attempts + 1, updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM scheduled_tasks \
                WHERE status = 'pending' AND scheduled_for <= NOW() \
                ORDER BY scheduled_for ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to claim scheduled task"))
    }

    /// Mark a task completed.
    pub async fn complete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE scheduled_tasks SET status = 'completed', completed_at = NOW(), \
             last_error = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to complete scheduled task"))?;
        Ok(())
    }

    /// Mark a task permanently failed.
    pub async fn fail(&self, id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE scheduled_tasks SET status = 'failed', last_error = $2, \
             completed_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to mark scheduled task failed"))?;
        Ok(())
    }

    /// Put a task back in the queue to run again at `retry_at`.
    pub async fn reschedule(
        &self,
        id: Uuid,
        error_message: &str,
        retry_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE scheduled_tasks SET status = 'pending', last_error = $2, scheduled_for = $3, \
             worker_id = NULL, started_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .bind(retry_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to reschedule task"))?;
        Ok(())
    }

    /// Mark tasks claimed before `started_before` and still `running` as
    /// failed. Returns how many rows were reclaimed.
    pub async fn fail_stale_running(
        &self,
        started_before: DateTime<Utc>,
        error_message: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE scheduled_tasks SET status = 'failed', last_error = $2, \
             completed_at = NOW(), updated_at = NOW() \
             WHERE status = 'running' AND started_at < $1",
        )
        .bind(started_before)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to reclaim stale scheduled tasks"))?;
        Ok(result.rows_affected())
    }

    /// Make a pending task due immediately. Returns `false` if it is not pending.
    pub async fn run_now(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE scheduled_tasks SET scheduled_for = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to trigger scheduled task"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete finished rows last updated before `before`.
    pub async fn cleanup_finished(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM scheduled_tasks \
             WHERE status IN ('completed', 'failed', 'cancelled') AND updated_at < $1",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Delete, "Failed to clean up scheduled tasks"))?;
        Ok(result.rows_affected())
    }
}

/// Insert a scheduled task on the given connection (usually a transaction).
pub(crate) async fn insert_scheduled_task(
    conn: &mut PgConnection,
    data: &CreateScheduledTask,
) -> AppResult<ScheduledTask> {
    sqlx::query_as::<_, ScheduledTask>(
        "INSERT INTO scheduled_tasks (task_type, payload, scheduled_for, max_attempts) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&data.task_type)
    .bind(&data.payload)
    .bind(data.scheduled_for)
    .bind(data.max_attempts)
    .fetch_one(conn)
    .await
    .map_err(|e| db_error(e, DbOperation::Create, "Failed to schedule task"))
}
