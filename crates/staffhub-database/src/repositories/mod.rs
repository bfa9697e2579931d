//! Repository implementations for all StaffHub entities.

pub mod document;
pub mod email_template;
pub mod hiring_manager;
pub mod note;
pub mod organization;
pub mod scheduled_task;
pub mod task;
pub mod team;
pub mod transfer;
pub mod user;

pub use document::DocumentRepository;
pub use email_template::EmailTemplateRepository;
pub use hiring_manager::HiringManagerRepository;
pub use note::NoteRepository;
pub use organization::OrganizationRepository;
pub use scheduled_task::ScheduledTaskRepository;
pub use task::{TaskFilter, TaskRepository};
pub use team::TeamRepository;
pub use transfer::TransferRepository;
pub use user::UserRepository;
