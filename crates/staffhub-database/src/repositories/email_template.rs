//! Email template repository.

use sqlx::PgPool;

use staffhub_core::result::AppResult;
use staffhub_entity::email_template::EmailTemplate;

use crate::error::{DbOperation, db_error};

/// Lookup of stored email templates.
#[derive(Debug, Clone)]
pub struct EmailTemplateRepository {
    pool: PgPool,
}

impl EmailTemplateRepository {
    /// Create a new template repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a template by its key, e.g. `TASK_REMINDER`.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>("SELECT * FROM email_templates WHERE template_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DbOperation::Read, "Failed to load email template"))
    }
}
