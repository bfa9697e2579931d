//! # staffhub-database
//!
//! PostgreSQL connection management, embedded migrations, error
//! classification, and concrete repositories for all StaffHub entities.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use error::{DbOperation, classify_pg_code};
