//! Hiring-manager transfer workflow configuration.

use serde::{Deserialize, Serialize};

/// Settings for the transfer request / approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Address notified whenever a transfer is requested.
    #[serde(default)]
    pub payroll_email: Option<String>,
    /// Days after approval before the deferred cleanup task runs.
    #[serde(default = "default_cleanup_delay")]
    pub cleanup_delay_days: i64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            payroll_email: None,
            cleanup_delay_days: default_cleanup_delay(),
        }
    }
}

fn default_cleanup_delay() -> i64 {
    7
}
