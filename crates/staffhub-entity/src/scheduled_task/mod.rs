//! Deferred work queue entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{CreateScheduledTask, ScheduledTask};
pub use payload::ScheduledTaskPayload;
pub use status::ScheduledTaskStatus;
