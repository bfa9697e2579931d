//! Task CRUD, completion, stats, notes, and history.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use staffhub_core::error::AppError;
use staffhub_core::types::TaskId;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::{NoteRepository, TaskFilter, TaskRepository};
use staffhub_entity::custom_fields;
use staffhub_entity::note::{CreateNote, HistoryEntry, NOTE_TYPE_GENERAL, Note, NoteTarget};
use staffhub_entity::schedule;
use staffhub_entity::task::model::REMINDER_FIELD;
use staffhub_entity::task::{CreateTask, Task, TaskStats, UpdateTask};

use crate::context::RequestContext;

/// Handles task use cases. Tasks are visible to their creator, their
/// assignee, and managers.
#[derive(Debug, Clone)]
pub struct TaskService {
    tasks: Arc<TaskRepository>,
    notes: Arc<NoteRepository>,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(tasks: Arc<TaskRepository>, notes: Arc<NoteRepository>) -> Self {
        Self { tasks, notes }
    }

    /// Lists the tasks visible to the caller.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Task>, AppError> {
        self.tasks
            .find_all(ctx.visibility_scope(), filter, &page)
            .await
    }

    /// Gets a task the caller may see.
    pub async fn get(&self, ctx: &RequestContext, id: TaskId) -> Result<Task, AppError> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        ctx.ensure_access(&[task.created_by, task.assigned_to], "task")?;
        Ok(task)
    }

    /// Creates a task owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: CreateTask) -> Result<Task, AppError> {
        if input.title.trim().is_empty() {
            return Err(AppError::validation("Task title is required"));
        }
        let due_date = parse_due_date(input.due_date.as_deref())?;
        validate_schedule(input.due_time.as_deref(), input.reminder_minutes)?;
        let fields = custom_fields::normalize(input.custom_fields.clone())?;
        validate_reminder_field(Some(&fields))?;

        let task = self.tasks.create(&input, due_date, fields, ctx.user_id).await?;
        info!(task_id = %task.id, user_id = %ctx.user_id, "Task created");
        Ok(task)
    }

    /// Updates a task, merging custom fields and re-arming its reminder
    /// when the schedule changes.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        input: UpdateTask,
    ) -> Result<Task, AppError> {
        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::validation("Task title cannot be empty"));
        }
        let due_date = parse_due_date(input.due_date.as_deref())?;
        validate_schedule(input.due_time.as_deref(), input.reminder_minutes)?;
        validate_reminder_field(input.custom_fields.as_ref())?;
        self.get(ctx, id).await?;

        self.tasks
            .update(id, &input, due_date, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Marks a task completed.
    pub async fn complete(&self, ctx: &RequestContext, id: TaskId) -> Result<Task, AppError> {
        self.set_completed(ctx, id, true).await
    }

    /// Reopens a completed task.
    pub async fn reopen(&self, ctx: &RequestContext, id: TaskId) -> Result<Task, AppError> {
        self.set_completed(ctx, id, false).await
    }

    async fn set_completed(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        completed: bool,
    ) -> Result<Task, AppError> {
        self.get(ctx, id).await?;
        let task = self
            .tasks
            .set_completed(id, completed, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        info!(task_id = %id, completed, user_id = %ctx.user_id, "Task completion changed");
        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete(&self, ctx: &RequestContext, id: TaskId) -> Result<(), AppError> {
        self.get(ctx, id).await?;
        if !self.tasks.delete(id).await? {
            return Err(AppError::not_found("Task not found"));
        }
        info!(task_id = %id, user_id = %ctx.user_id, "Task deleted");
        Ok(())
    }

    /// Counters over the caller's visible tasks.
    pub async fn stats(&self, ctx: &RequestContext) -> Result<TaskStats, AppError> {
        self.tasks
            .stats(ctx.visibility_scope(), Utc::now().date_naive())
            .await
    }

    /// Lists notes on a task.
    pub async fn notes(&self, ctx: &RequestContext, id: TaskId) -> Result<Vec<Note>, AppError> {
        self.get(ctx, id).await?;
        self.notes.list(NoteTarget::Task, id.into_uuid()).await
    }

    /// Adds a note to a task.
    pub async fn add_note(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        input: CreateNote,
    ) -> Result<Note, AppError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Note text is required"));
        }
        self.get(ctx, id).await?;
        let note_type = input.note_type.as_deref().unwrap_or(NOTE_TYPE_GENERAL);
        self.notes
            .create(NoteTarget::Task, id.into_uuid(), note_type, text, Some(ctx.user_id))
            .await
    }

    /// Lists the history of a task.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        id: TaskId,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        self.get(ctx, id).await?;
        self.notes.history(NoteTarget::Task, id.into_uuid()).await
    }
}

/// Parse an optional due date from input. Blank means "not given".
fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => schedule::parse_due_date(s).map(Some).ok_or_else(|| {
            AppError::validation(format!(
                "Invalid due date '{s}'. Use YYYY-MM-DD or MM/DD/YYYY"
            ))
        }),
    }
}

/// Reject due times and reminder offsets the reminder engine cannot use.
fn validate_schedule(due_time: Option<&str>, reminder_minutes: Option<i32>) -> Result<(), AppError> {
    if let Some(t) = due_time.map(str::trim).filter(|s| !s.is_empty()) {
        if schedule::parse_due_time(t).is_none() {
            return Err(AppError::validation(format!(
                "Invalid due time '{t}'. Use HH:MM or h:MM AM/PM"
            )));
        }
    }
    if reminder_minutes.is_some_and(|m| m < 0) {
        return Err(AppError::validation("Reminder minutes cannot be negative"));
    }
    if reminder_minutes.is_some_and(|m| i64::from(m) > schedule::MAX_REMINDER_MINUTES) {
        return Err(AppError::validation(format!(
            "Reminder minutes cannot exceed {}",
            schedule::MAX_REMINDER_MINUTES
        )));
    }
    Ok(())
}

/// Reject a `Reminder` custom field the reminder engine cannot schedule.
fn validate_reminder_field(fields: Option<&serde_json::Value>) -> Result<(), AppError> {
    match fields.and_then(|f| f.get(REMINDER_FIELD)) {
        Some(value) => schedule::check_reminder_value(value),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_core::error::ErrorKind;

    #[test]
    fn test_parse_due_date_input() {
        assert_eq!(parse_due_date(None).unwrap(), None);
        assert_eq!(parse_due_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_due_date(Some("12/31/2024")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        let err = parse_due_date(Some("someday")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_validate_schedule() {
        assert!(validate_schedule(Some("9:30 AM"), Some(60)).is_ok());
        assert!(validate_schedule(None, None).is_ok());
        assert!(validate_schedule(Some("25:99"), None).is_err());
        assert!(validate_schedule(None, Some(-5)).is_err());
        assert!(validate_schedule(None, Some(i32::MAX)).is_err());
    }

    #[test]
    fn test_validate_reminder_field() {
        use serde_json::json;

        assert!(validate_reminder_field(None).is_ok());
        assert!(validate_reminder_field(Some(&json!({}))).is_ok());
        assert!(validate_reminder_field(Some(&json!({"Reminder": "2 hours"}))).is_ok());
        assert!(validate_reminder_field(Some(&json!({"Reminder": "None"}))).is_ok());

        let err = validate_reminder_field(Some(&json!({"Reminder": "999999999999 days"})))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
