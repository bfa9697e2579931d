//! # staffhub-core
//!
//! Core crate for StaffHub. Contains configuration schemas, typed
//! identifiers, pagination types, the outbound mail trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other StaffHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
