//! Teams and team membership.

pub mod service;

pub use service::TeamService;
