//! Stored email templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Template key for task reminder emails.
pub const TASK_REMINDER: &str = "TASK_REMINDER";
/// Template key for the payroll notification on a new transfer request.
pub const HIRING_MANAGER_TRANSFER_REQUEST: &str = "HIRING_MANAGER_TRANSFER_REQUEST";

/// An editable email template with `{{placeholder}}` tokens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailTemplate {
    /// Template ID.
    pub id: Uuid,
    /// Lookup key, e.g. `TASK_REMINDER`.
    pub template_key: String,
    /// Subject line template.
    pub subject: String,
    /// HTML body template.
    pub body_html: String,
    /// Plain-text body template.
    pub body_text: Option<String>,
    /// Last edit.
    pub updated_at: DateTime<Utc>,
}
