//! Task domain entities and reminder candidates.

pub mod model;
pub mod reminder;

pub use model::{CreateTask, Task, TaskStats, UpdateTask};
pub use reminder::ReminderCandidate;
