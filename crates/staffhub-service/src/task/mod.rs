//! Task management and the reminder engine.

pub mod reminder;
pub mod service;

pub use reminder::{DueReminder, ReminderFailure, ReminderRunSummary, ReminderService};
pub use service::TaskService;
