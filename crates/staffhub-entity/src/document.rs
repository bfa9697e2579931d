//! Document metadata rows.
//!
//! Documents are attached polymorphically via `(entity_type, entity_id)`.
//! Only the metadata is stored here; file bytes live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::UserId;

/// `entity_type` value for documents owned by a hiring manager.
pub const ENTITY_TYPE_HIRING_MANAGER: &str = "hiring_manager";

/// A document attached to some record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Document ID.
    pub id: Uuid,
    /// Owning record type (`hiring_manager`, `organization`, ...).
    pub entity_type: String,
    /// Owning record ID.
    pub entity_id: Uuid,
    /// Display name.
    pub document_name: String,
    /// Free-form category.
    pub document_type: Option<String>,
    /// Storage path.
    pub file_path: Option<String>,
    /// Uploader.
    pub created_by: Option<UserId>,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}
