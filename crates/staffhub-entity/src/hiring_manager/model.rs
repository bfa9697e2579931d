//! Hiring manager entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::{HiringManagerId, UserId};

/// Status of a hiring manager in good standing.
pub const STATUS_ACTIVE: &str = "Active";
/// Status given to the source hiring manager once a transfer is approved.
pub const STATUS_ARCHIVED: &str = "Archived";

/// A client-side hiring manager, belonging to one organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HiringManager {
    /// Hiring manager ID.
    pub id: HiringManagerId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Owning organization.
    pub organization_id: Uuid,
    /// `Active`, `Archived`, ...
    pub status: String,
    /// User-defined fields.
    pub custom_fields: serde_json::Value,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

impl HiringManager {
    /// "First Last", the form job postings store in their `hiring_manager` column.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Whether this hiring manager was archived by a transfer.
    pub fn is_archived(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ARCHIVED)
    }
}

/// Data for a new hiring manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHiringManager {
    /// First name.
    #[serde(alias = "firstName")]
    pub first_name: String,
    /// Last name.
    #[serde(alias = "lastName")]
    pub last_name: String,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Owning organization.
    #[serde(alias = "organizationId")]
    pub organization_id: Uuid,
    /// Status; defaults to `Active`.
    #[serde(default)]
    pub status: Option<String>,
    /// User-defined fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

/// Partial update of a hiring manager. `custom_fields` is merged shallowly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHiringManager {
    /// First name.
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Move to another organization.
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<Uuid>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Fields to merge into the stored custom fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HiringManager {
        HiringManager {
            id: HiringManagerId::new(),
            first_name: " Dana ".into(),
            last_name: "Reyes".into(),
            email: None,
            phone: None,
            title: None,
            organization_id: Uuid::new_v4(),
            status: STATUS_ACTIVE.into(),
            custom_fields: serde_json::json!({}),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name_trims_parts() {
        assert_eq!(sample().full_name(), "Dana Reyes");
    }

    #[test]
    fn test_is_archived_ignores_case() {
        let mut hm = sample();
        assert!(!hm.is_archived());
        hm.status = "archived".into();
        assert!(hm.is_archived());
    }

    #[test]
    fn test_create_accepts_both_casings() {
        let org = Uuid::new_v4();
        let camel: CreateHiringManager = serde_json::from_value(serde_json::json!({
            "firstName": "A", "lastName": "B", "organizationId": org
        }))
        .unwrap();
        let snake: CreateHiringManager = serde_json::from_value(serde_json::json!({
            "first_name": "A", "last_name": "B", "organization_id": org
        }))
        .unwrap();
        assert_eq!(camel.organization_id, snake.organization_id);
        assert_eq!(camel.first_name, snake.first_name);
    }
}
