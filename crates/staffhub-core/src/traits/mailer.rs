//! Outbound mail trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient addresses. Delivered as a single message.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

/// Trait for mail delivery backends.
///
/// The SMTP implementation lives in `staffhub-service`; a log-only
/// implementation is used when delivery is disabled.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., `"smtp"`, `"log"`).
    fn backend(&self) -> &str;

    /// Deliver a message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}
