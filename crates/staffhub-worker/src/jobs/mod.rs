//! Built-in job handler implementations.

pub mod reminder;
pub mod transfer_cleanup;

pub use reminder::ReminderScanJobHandler;
pub use transfer_cleanup::TransferCleanupJobHandler;
