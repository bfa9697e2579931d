//! Note and history repository shared by every parent record type.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_core::types::UserId;
use staffhub_entity::note::{HistoryEntry, Note, NoteTarget};

use crate::error::{DbOperation, db_error};

/// Repository for `<parent>_notes` and `<parent>_history` tables.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    /// Create a new note repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List notes for a parent record, newest first.
    pub async fn list(&self, target: NoteTarget, entity_id: Uuid) -> AppResult<Vec<Note>> {
        let sql = format!(
            "SELECT id, {col} AS entity_id, note_type, text, created_by, created_at \
             FROM {table} WHERE {col} = $1 ORDER BY created_at DESC",
            col = target.parent_column(),
            table = target.notes_table(),
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to list notes"))
    }

    /// Add a note to a parent record.
    pub async fn create(
        &self,
        target: NoteTarget,
        entity_id: Uuid,
        note_type: &str,
        text: &str,
        created_by: Option<UserId>,
    ) -> AppResult<Note> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error(e, DbOperation::Create, "Failed to acquire connection"))?;
        insert_note(&mut conn, target, entity_id, note_type, text, created_by).await
    }

    /// List history entries for a parent record, newest first.
    ///
    /// Parents without a history table yield an empty list.
    pub async fn history(
        &self,
        target: NoteTarget,
        entity_id: Uuid,
    ) -> AppResult<Vec<HistoryEntry>> {
        let Some(table) = target.history_table() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT id, {col} AS entity_id, action, details, performed_by, performed_at \
             FROM {table} WHERE {col} = $1 ORDER BY performed_at DESC",
            col = target.parent_column(),
        );
        sqlx::query_as::<_, HistoryEntry>(&sql)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to list history"))
    }
}

/// Insert a note on the given connection (usually a transaction).
pub(crate) async fn insert_note(
    conn: &mut PgConnection,
    target: NoteTarget,
    entity_id: Uuid,
    note_type: &str,
    text: &str,
    created_by: Option<UserId>,
) -> AppResult<Note> {
    let sql = format!(
        "INSERT INTO {table} ({col}, note_type, text, created_by) VALUES ($1, $2, $3, $4) \
         RETURNING id, {col} AS entity_id, note_type, text, created_by, created_at",
        col = target.parent_column(),
        table = target.notes_table(),
    );
    sqlx::query_as::<_, Note>(&sql)
        .bind(entity_id)
        .bind(note_type)
        .bind(text)
        .bind(created_by)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to add note"))
}

/// Append a history entry on the given connection. A no-op for parents
/// without a history table.
pub(crate) async fn append_history(
    conn: &mut PgConnection,
    target: NoteTarget,
    entity_id: Uuid,
    action: &str,
    details: serde_json::Value,
    performed_by: Option<UserId>,
) -> AppResult<()> {
    let Some(table) = target.history_table() else {
        return Ok(());
    };
    let sql = format!(
        "INSERT INTO {table} ({col}, action, details, performed_by) VALUES ($1, $2, $3, $4)",
        col = target.parent_column(),
    );
    sqlx::query(&sql)
        .bind(entity_id)
        .bind(action)
        .bind(details)
        .bind(performed_by)
        .execute(conn)
        .await
        .map_err(|e| db_error(e, DbOperation::Create, "Failed to append history"))?;
    Ok(())
}
