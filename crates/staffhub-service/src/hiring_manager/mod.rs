//! Hiring manager management.

pub mod service;

pub use service::HiringManagerService;
