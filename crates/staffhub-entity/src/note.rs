//! Notes and history entries shared by organizations, hiring managers,
//! and tasks.
//!
//! Each parent owns its own `<parent>_notes` table (and, for organizations
//! and tasks, a `<parent>_history` table). Repositories alias the parent
//! foreign key to `entity_id` so the same row types serve every parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::UserId;

/// Default note type for user-entered notes.
pub const NOTE_TYPE_GENERAL: &str = "general";
/// Note type for audit notes written by the transfer workflow.
pub const NOTE_TYPE_TRANSFER: &str = "transfer";

/// The kind of record a note or history entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteTarget {
    /// `organization_notes` / `organization_history`.
    Organization,
    /// `hiring_manager_notes`.
    HiringManager,
    /// `task_notes` / `task_history`.
    Task,
}

impl NoteTarget {
    /// Table holding the notes for this target.
    pub fn notes_table(&self) -> &'static str {
        match self {
            Self::Organization => "organization_notes",
            Self::HiringManager => "hiring_manager_notes",
            Self::Task => "task_notes",
        }
    }

    /// Table holding the history for this target, if it keeps one.
    pub fn history_table(&self) -> Option<&'static str> {
        match self {
            Self::Organization => Some("organization_history"),
            Self::HiringManager => None,
            Self::Task => Some("task_history"),
        }
    }

    /// Foreign-key column pointing at the parent row.
    pub fn parent_column(&self) -> &'static str {
        match self {
            Self::Organization => "organization_id",
            Self::HiringManager => "hiring_manager_id",
            Self::Task => "task_id",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::HiringManager => "Hiring manager",
            Self::Task => "Task",
        }
    }
}

/// A note attached to a parent record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    /// Note ID.
    pub id: Uuid,
    /// ID of the parent record.
    pub entity_id: Uuid,
    /// Note category (`general`, `transfer`, ...).
    pub note_type: String,
    /// Note body.
    pub text: String,
    /// Author.
    pub created_by: Option<UserId>,
    /// When the note was written.
    pub created_at: DateTime<Utc>,
}

/// Data for a new note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Note body.
    #[serde(alias = "note", alias = "content")]
    pub text: String,
    /// Note category; defaults to `general`.
    #[serde(default, alias = "noteType")]
    pub note_type: Option<String>,
}

/// One row of an audit history side table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Entry ID.
    pub id: Uuid,
    /// ID of the parent record.
    pub entity_id: Uuid,
    /// What happened (`created`, `updated`, `completed`, ...).
    pub action: String,
    /// Structured details of the change.
    pub details: serde_json::Value,
    /// Who performed the action.
    pub performed_by: Option<UserId>,
    /// When it happened.
    pub performed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_note_accepts_aliases() {
        let note: CreateNote =
            serde_json::from_str(r#"{"note": "Called back", "noteType": "call"}"#).unwrap();
        assert_eq!(note.text, "Called back");
        assert_eq!(note.note_type.as_deref(), Some("call"));
    }

    #[test]
    fn test_hiring_managers_keep_no_history() {
        assert_eq!(NoteTarget::HiringManager.history_table(), None);
        assert_eq!(NoteTarget::Task.history_table(), Some("task_history"));
    }
}
