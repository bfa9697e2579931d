//! # staffhub-api
//!
//! HTTP API layer for StaffHub built on Axum.
//!
//! Provides the REST endpoints, middleware (request logging, CORS),
//! actor extraction from gateway headers, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
