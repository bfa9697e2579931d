//! Background work for StaffHub.
//!
//! This crate provides:
//! - A queue over the `scheduled_tasks` table
//! - A runner that polls the queue and executes claimed tasks
//! - An executor that dispatches tasks to the handler for their type
//! - A cron scheduler that enqueues the periodic reminder scan
//! - Handlers for the reminder scan and the deferred transfer cleanup

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::{QueueStats, TaskQueue};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
