//! Transfer status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a transfer request. `Approved` and `Denied` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Waiting for a manager decision.
    Pending,
    /// Approved; data has been migrated to the target.
    Approved,
    /// Denied with a reason.
    Denied,
}

impl TransferStatus {
    /// Check if the transfer can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = staffhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            _ => Err(staffhub_core::AppError::validation(format!(
                "Invalid transfer status: '{s}'. Expected one of: pending, approved, denied"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(TransferStatus::Approved.is_terminal());
        assert!(TransferStatus::Denied.is_terminal());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Approved".parse::<TransferStatus>().unwrap(), TransferStatus::Approved);
        assert!("cancelled".parse::<TransferStatus>().is_err());
    }
}
