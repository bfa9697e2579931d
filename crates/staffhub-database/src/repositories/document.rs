//! Document metadata repository.

use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_entity::document::Document;

use crate::error::{DbOperation, db_error};

/// Read access to document metadata.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the documents attached to a record.
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY created_at DESC",
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, DbOperation::Read, "Failed to list documents"))
    }
}
