//! Core traits defined in `staffhub-core` and implemented by other crates.

pub mod mailer;

pub use mailer::{EmailMessage, Mailer};
