//! # staffhub-entity
//!
//! Domain entity models for StaffHub. Every struct in this crate
//! represents a database table row, a create/update input, or a domain
//! value object. Row types derive `sqlx::FromRow`; input types accept
//! both camelCase and snake_case keys so that older clients keep working.

pub mod custom_fields;
pub mod document;
pub mod email_template;
pub mod hiring_manager;
pub mod note;
pub mod organization;
pub mod schedule;
pub mod scheduled_task;
pub mod task;
pub mod team;
pub mod transfer;
pub mod user;
