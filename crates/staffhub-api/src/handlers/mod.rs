//! Route handlers organized by domain.

pub mod health;
pub mod hiring_manager;
pub mod organization;
pub mod reminder;
pub mod task;
pub mod team;
pub mod transfer;
pub mod user;
