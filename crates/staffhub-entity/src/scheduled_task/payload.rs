//! Typed payloads for known scheduled task types.

use serde::{Deserialize, Serialize};

use staffhub_core::types::{HiringManagerId, TransferId};

/// Task type of the deferred transfer cleanup.
pub const TRANSFER_CLEANUP: &str = "hiring_manager_transfer_cleanup";
/// Task type of the periodic reminder scan.
pub const TASK_REMINDER_SCAN: &str = "task_reminder_scan";

/// Payload of a scheduled task, tagged by its `task_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task_type")]
pub enum ScheduledTaskPayload {
    /// Sweep stragglers left on an archived hiring manager.
    #[serde(rename = "hiring_manager_transfer_cleanup")]
    TransferCleanup {
        /// The approved transfer.
        transfer_id: TransferId,
        /// Archived source.
        source_hiring_manager_id: HiringManagerId,
        /// Target that receives stragglers.
        target_hiring_manager_id: HiringManagerId,
    },
    /// Scan tasks and send due reminders.
    #[serde(rename = "task_reminder_scan")]
    TaskReminderScan,
}

impl ScheduledTaskPayload {
    /// The `task_type` column value for this payload.
    pub fn task_type(&self) -> &'static str {
        match self {
            Self::TransferCleanup { .. } => TRANSFER_CLEANUP,
            Self::TaskReminderScan => TASK_REMINDER_SCAN,
        }
    }

    /// Serialize into the JSON stored in the `payload` column.
    pub fn to_json(&self) -> Result<serde_json::Value, staffhub_core::AppError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a stored payload.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, staffhub_core::AppError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_task_type_tag() {
        let payload = ScheduledTaskPayload::TransferCleanup {
            transfer_id: TransferId::new(),
            source_hiring_manager_id: HiringManagerId::new(),
            target_hiring_manager_id: HiringManagerId::new(),
        };
        let json = payload.to_json().unwrap();
        assert_eq!(json["task_type"], TRANSFER_CLEANUP);
        assert_eq!(ScheduledTaskPayload::from_json(&json).unwrap(), payload);
    }

    #[test]
    fn test_unit_payload() {
        let json = ScheduledTaskPayload::TaskReminderScan.to_json().unwrap();
        assert_eq!(json, serde_json::json!({"task_type": "task_reminder_scan"}));
    }
}
