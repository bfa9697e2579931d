//! # staffhub-service
//!
//! Business logic service layer for StaffHub. Each service orchestrates
//! repositories and the mailer to implement one area of the platform:
//! record CRUD with owner-based visibility, the hiring manager transfer
//! workflow, and the task reminder engine.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod email;
pub mod hiring_manager;
pub mod organization;
pub mod task;
pub mod team;
pub mod transfer;
pub mod user;

pub use context::RequestContext;
pub use email::{EmailService, LogMailer, SmtpMailer, build_mailer};
pub use hiring_manager::HiringManagerService;
pub use organization::OrganizationService;
pub use task::{ReminderRunSummary, ReminderService, TaskService};
pub use team::TeamService;
pub use transfer::{ApprovedTransfer, TransferService};
pub use user::UserService;
