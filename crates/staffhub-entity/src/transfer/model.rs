//! Transfer request model and inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staffhub_core::types::{HiringManagerId, TransferId, UserId};

use super::status::TransferStatus;

/// A request to move everything owned by one hiring manager to another.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HiringManagerTransfer {
    /// Transfer ID.
    pub id: TransferId,
    /// Hiring manager whose data moves out (archived on approval).
    pub source_hiring_manager_id: HiringManagerId,
    /// Hiring manager receiving the data.
    pub target_hiring_manager_id: HiringManagerId,
    /// Requester.
    pub requested_by: Option<UserId>,
    /// Current status.
    pub status: TransferStatus,
    /// Approver.
    pub approved_by: Option<UserId>,
    /// Approval time.
    pub approved_at: Option<DateTime<Utc>>,
    /// Denier.
    pub denied_by: Option<UserId>,
    /// Denial time.
    pub denied_at: Option<DateTime<Utc>>,
    /// Reason given on denial.
    pub denial_reason: Option<String>,
    /// Request time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Body of a transfer request. Both IDs are optional so that a missing
/// one is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTransfer {
    /// Source hiring manager.
    #[serde(default, alias = "sourceHiringManagerId", alias = "source_id")]
    pub source_hiring_manager_id: Option<HiringManagerId>,
    /// Target hiring manager.
    #[serde(default, alias = "targetHiringManagerId", alias = "target_id")]
    pub target_hiring_manager_id: Option<HiringManagerId>,
}

/// Body of a denial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DenyTransfer {
    /// Why the transfer was denied. Must be non-blank.
    #[serde(default, alias = "denialReason", alias = "denial_reason")]
    pub reason: Option<String>,
}

/// What the approval migration moved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Notes reassigned to the target.
    pub notes_moved: u64,
    /// Documents reassigned to the target.
    pub documents_moved: u64,
    /// Tasks reassigned to the target.
    pub tasks_moved: u64,
    /// Job postings whose hiring manager name was rewritten.
    pub jobs_updated: u64,
    /// Deferred cleanup row in `scheduled_tasks`.
    pub cleanup_task_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transfer_aliases() {
        let source = HiringManagerId::new();
        let target = HiringManagerId::new();
        let body = serde_json::json!({
            "sourceHiringManagerId": source,
            "target_hiring_manager_id": target,
        });
        let input: CreateTransfer = serde_json::from_value(body).unwrap();
        assert_eq!(input.source_hiring_manager_id, Some(source));
        assert_eq!(input.target_hiring_manager_id, Some(target));
    }

    #[test]
    fn test_missing_ids_deserialize_as_none() {
        let input: CreateTransfer = serde_json::from_str("{}").unwrap();
        assert!(input.source_hiring_manager_id.is_none());
        let deny: DenyTransfer = serde_json::from_str(r#"{"denialReason": "dup"}"#).unwrap();
        assert_eq!(deny.reason.as_deref(), Some("dup"));
    }
}
