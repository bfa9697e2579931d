//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::UserId;

/// Status given to organizations created without one.
pub const DEFAULT_STATUS: &str = "Active";

/// A client organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Organization ID.
    pub id: Uuid,
    /// Legal or display name.
    pub name: String,
    /// Industry.
    pub industry: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Main phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form status (`Active`, `Prospect`, ...).
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

/// Data for a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Name.
    #[serde(alias = "organizationName", alias = "organization_name")]
    pub name: String,
    /// Industry.
    #[serde(default)]
    pub industry: Option<String>,
    /// Website.
    #[serde(default)]
    pub website: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Address.
    #[serde(default)]
    pub address: Option<String>,
    /// Status; defaults to `Active`.
    #[serde(default)]
    pub status: Option<String>,
    /// User-defined fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

/// Partial update of an organization. `custom_fields` is merged shallowly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// Name.
    #[serde(default, alias = "organizationName", alias = "organization_name")]
    pub name: Option<String>,
    /// Industry.
    #[serde(default)]
    pub industry: Option<String>,
    /// Website.
    #[serde(default)]
    pub website: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Address.
    #[serde(default)]
    pub address: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Fields to merge into the stored custom fields.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Option<serde_json::Value>,
}

impl UpdateOrganization {
    /// Names of the fields this update touches, for the history log.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.industry.is_some() {
            fields.push("industry");
        }
        if self.website.is_some() {
            fields.push("website");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.address.is_some() {
            fields.push("address");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.custom_fields.is_some() {
            fields.push("custom_fields");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accepts_camel_case() {
        let input: CreateOrganization = serde_json::from_str(
            r#"{"organizationName": "Acme", "customFields": {"Tier": "Gold"}}"#,
        )
        .unwrap();
        assert_eq!(input.name, "Acme");
        assert_eq!(input.custom_fields.unwrap()["Tier"], "Gold");
    }

    #[test]
    fn test_changed_fields() {
        let update = UpdateOrganization {
            status: Some("Inactive".into()),
            custom_fields: Some(serde_json::json!({})),
            ..Default::default()
        };
        assert_eq!(update.changed_fields(), vec!["status", "custom_fields"]);
    }
}
