//! Hiring manager transfer workflow.

pub mod notify;
pub mod service;

pub use service::{ApprovedTransfer, TransferService};
