//! Hiring manager transfer entities.

pub mod model;
pub mod status;

pub use model::{CreateTransfer, DenyTransfer, HiringManagerTransfer, MigrationSummary};
pub use status::TransferStatus;
