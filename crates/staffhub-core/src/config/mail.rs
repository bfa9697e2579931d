//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// SMTP relay configuration.
///
/// When `enabled` is false, messages are written to the log instead of
/// being delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Whether mail is delivered over SMTP.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default, skip_serializing)]
    pub smtp_password: String,
    /// Sender mailbox, e.g. `"StaffHub <no-reply@example.com>"`.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "StaffHub <no-reply@staffhub.local>".to_string()
}
