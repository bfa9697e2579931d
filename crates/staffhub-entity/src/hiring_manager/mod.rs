//! Hiring manager entities.

pub mod model;

pub use model::{CreateHiringManager, HiringManager, UpdateHiringManager};
