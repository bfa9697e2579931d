//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Cron expression (with seconds) for the task reminder scan.
    #[serde(default = "default_reminder_cron")]
    pub reminder_cron: String,
    /// Minutes a claimed task may stay `running` before it is treated as
    /// abandoned and marked failed.
    #[serde(default = "default_stale_after")]
    pub stale_after_minutes: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            reminder_cron: default_reminder_cron(),
            stale_after_minutes: default_stale_after(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    5
}

fn default_reminder_cron() -> String {
    "0 */5 * * * *".to_string()
}

fn default_stale_after() -> i64 {
    30
}
