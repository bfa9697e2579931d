//! Task repository implementation, including the reminder scan queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_core::types::{HiringManagerId, TaskId, UserId};
use staffhub_entity::custom_fields;
use staffhub_entity::note::NoteTarget;
use staffhub_entity::task::model::{DEFAULT_PRIORITY, STATUS_COMPLETED, STATUS_OPEN};
use staffhub_entity::task::{CreateTask, ReminderCandidate, Task, TaskStats, UpdateTask};

use crate::error::{self, DbOperation, db_error};

use super::note::append_history;

/// Optional list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only completed (`true`) or open (`false`) tasks.
    #[serde(default, alias = "isCompleted", alias = "is_completed")]
    pub completed: Option<bool>,
    /// Only tasks for this hiring manager.
    #[serde(default, alias = "hiringManagerId")]
    pub hiring_manager_id: Option<HiringManagerId>,
    /// Only tasks for this organization.
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<Uuid>,
}

/// Repository for tasks and their history.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

const VISIBLE: &str = "($1::uuid IS NULL OR created_by = $1 OR assigned_to = $1)";

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a task by ID.
    pub async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to find task"))
    }

    /// List tasks visible to `viewer` (all tasks when `None`), soonest due first.
    pub async fn find_all(
        &self,
        viewer: Option<UserId>,
        filter: &TaskFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Task>> {
        let where_clause = format!(
            "{VISIBLE} AND ($2::boolean IS NULL OR is_completed = $2) \
             AND ($3::uuid IS NULL OR hiring_manager_id = $3) \
             AND ($4::uuid IS NULL OR organization_id = $4)"
        );

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tasks WHERE {where_clause}"))
                .bind(viewer)
                .bind(filter.completed)
                .bind(filter.hiring_manager_id)
                .bind(filter.organization_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, DbOperation::Read, "Failed to count tasks"))?;

        let items = sqlx::query_as::<_, Task>(&format!(
            "SELECT * FROM tasks WHERE {where_clause} \
             ORDER BY due_date ASC NULLS LAST, created_at DESC LIMIT $5 OFFSET $6"
        ))
        .bind(viewer)
        .bind(filter.completed)
        .bind(filter.hiring_manager_id)
        .bind(filter.organization_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list tasks"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Create a task and record a `created` history entry.
    pub async fn create(
        &self,
        data: &CreateTask,
        due_date: Option<NaiveDate>,
        custom_fields: serde_json::Value,
        created_by: UserId,
    ) -> AppResult<Task> {
        let mut tx = error::begin(&self.pool).await?;

        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks \
                (title, description, status, priority, due_date, due_time, reminder_minutes, \
                 assigned_to, created_by, organization_id, hiring_manager_id, custom_fields) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(data.title.trim())
        .bind(&data.description)
        .bind(data.status.as_deref().unwrap_or(STATUS_OPEN))
        .bind(data.priority.as_deref().unwrap_or(DEFAULT_PRIORITY))
        .bind(due_date)
        .bind(data.due_time.as_deref().map(str::trim))
        .bind(data.reminder_minutes)
        .bind(data.assigned_to)
        .bind(created_by)
        .bind(data.organization_id)
        .bind(data.hiring_manager_id)
        .bind(&custom_fields)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to create task"))?;

        append_history(
            &mut tx,
            NoteTarget::Task,
            task.id.into_uuid(),
            "created",
            json!({ "title": task.title }),
            Some(created_by),
        )
        .await?;

        error::commit(tx).await?;
        Ok(task)
    }

    /// Apply a partial update under a row lock.
    ///
    /// Custom fields are merged shallowly. Changing any scheduling input
    /// clears `reminder_sent_at` so the reminder fires again for the new
    /// time.
    pub async fn update(
        &self,
        id: TaskId,
        data: &UpdateTask,
        due_date: Option<NaiveDate>,
        performed_by: UserId,
    ) -> AppResult<Option<Task>> {
        let mut tx = error::begin(&self.pool).await?;

        let existing = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error(e, DbOperation::Update, "Failed to lock task"))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = match &data.custom_fields {
            Some(patch) => custom_fields::merge(Some(&existing.custom_fields), patch)?,
            None => existing.custom_fields.clone(),
        };

        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                status = COALESCE($4, status), \
                priority = COALESCE($5, priority), \
                due_date = COALESCE($6, due_date), \
                due_time = COALESCE($7, due_time), \
                reminder_minutes = COALESCE($8, reminder_minutes), \
                assigned_to = COALESCE($9, assigned_to), \
                organization_id = COALESCE($10, organization_id), \
                hiring_manager_id = COALESCE($11, hiring_manager_id), \
                custom_fields = $12, \
                reminder_sent_at = CASE WHEN $13 THEN NULL ELSE reminder_sent_at END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.title.as_deref().map(str::trim))
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.priority)
        .bind(due_date)
        .bind(data.due_time.as_deref().map(str::trim))
        .bind(data.reminder_minutes)
        .bind(data.assigned_to)
        .bind(data.organization_id)
        .bind(data.hiring_manager_id)
        .bind(&merged)
        .bind(data.touches_schedule())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to update task"))?;

        append_history(
            &mut tx,
            NoteTarget::Task,
            id.into_uuid(),
            "updated",
            json!({ "fields": data.changed_fields() }),
            Some(performed_by),
        )
        .await?;

        error::commit(tx).await?;
        Ok(Some(task))
    }

    /// Mark a task completed or reopen it, recording the change in history.
    pub async fn set_completed(
        &self,
        id: TaskId,
        completed: bool,
        performed_by: UserId,
    ) -> AppResult<Option<Task>> {
        let mut tx = error::begin(&self.pool).await?;

        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                is_completed = $2, \
                completed_at = CASE WHEN $2 THEN NOW() ELSE NULL END, \
                status = CASE WHEN $2 THEN $3 ELSE $4 END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(completed)
        .bind(STATUS_COMPLETED)
        .bind(STATUS_OPEN)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to change task completion"))?;
        let Some(task) = task else {
            return Ok(None);
        };

        let action = if completed { "completed" } else { "reopened" };
        append_history(
            &mut tx,
            NoteTarget::Task,
            id.into_uuid(),
            action,
            json!({}),
            Some(performed_by),
        )
        .await?;

        error::commit(tx).await?;
        Ok(Some(task))
    }

    /// Delete a task.
    pub async fn delete(&self, id: TaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Delete, "Failed to delete task"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Counters over the tasks visible to `viewer`, relative to `today`.
    pub async fn stats(&self, viewer: Option<UserId>, today: NaiveDate) -> AppResult<TaskStats> {
        sqlx::query_as::<_, TaskStats>(&format!(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE is_completed) AS completed, \
                COUNT(*) FILTER (WHERE NOT is_completed) AS open, \
                COUNT(*) FILTER (WHERE NOT is_completed AND due_date < $2) AS overdue, \
                COUNT(*) FILTER (WHERE NOT is_completed AND due_date = $2) AS due_today \
             FROM tasks WHERE {VISIBLE}"
        ))
        .bind(viewer)
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to compute task stats"))
    }

    /// Open, dated, not-yet-reminded tasks that carry some reminder setting.
    ///
    /// Whether the reminder window has opened is decided in process, since
    /// the stored representations vary too much for SQL.
    pub async fn reminder_candidates(&self) -> AppResult<Vec<ReminderCandidate>> {
        sqlx::query_as::<_, ReminderCandidate>(
            "SELECT t.id, t.title, t.description, t.priority, t.due_date, t.due_time, \
                    t.reminder_minutes, t.custom_fields, \
                    c.email AS created_by_email, c.name AS created_by_name, \
                    a.email AS assigned_to_email, a.name AS assigned_to_name \
             FROM tasks t \
             LEFT JOIN users c ON c.id = t.created_by AND c.is_active \
             LEFT JOIN users a ON a.id = t.assigned_to AND a.is_active \
             WHERE t.is_completed = FALSE \
               AND t.due_date IS NOT NULL \
               AND t.reminder_sent_at IS NULL \
               AND (t.reminder_minutes IS NOT NULL OR t.custom_fields ->> 'Reminder' IS NOT NULL) \
             ORDER BY t.due_date ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to load reminder candidates"))
    }

    /// Current `reminder_sent_at` of a task; `None` if the task is gone.
    pub async fn reminder_sent_at(&self, id: TaskId) -> AppResult<Option<Option<DateTime<Utc>>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT reminder_sent_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to read reminder state"))
    }

    /// Record that the reminder went out. Returns `false` if another run
    /// already recorded it.
    pub async fn mark_reminder_sent(&self, id: TaskId, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET reminder_sent_at = $2 WHERE id = $1 AND reminder_sent_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Update, "Failed to mark reminder sent"))?;
        Ok(result.rows_affected() > 0)
    }
}
