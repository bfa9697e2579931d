//! Mail delivery backends.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use staffhub_core::config::MailConfig;
use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_core::traits::{EmailMessage, Mailer};

/// Delivers mail through an SMTP relay with STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Build the SMTP transport from configuration.
    pub fn from_config(config: &MailConfig) -> AppResult<Self> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid mail.from_address '{}'", config.from_address),
                e,
            )
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to create SMTP transport for '{}'", config.smtp_host),
                    e,
                )
            })?
            .port(config.smtp_port);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, message: &EmailMessage) -> AppResult<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message.subject.clone());
        for recipient in &message.to {
            let mailbox: Mailbox = recipient.parse().map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Invalid recipient address '{recipient}'"),
                    e,
                )
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html.clone()),
                    ),
            )
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build email message", e)
            })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn backend(&self) -> &str {
        "smtp"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if message.to.is_empty() {
            return Err(AppError::validation("Email has no recipients"));
        }
        let email = self.build_message(message)?;
        self.transport.send(email).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to send email via SMTP: {e}"),
                e,
            )
        })?;

        info!(
            recipients = message.to.len(),
            subject = %message.subject,
            "Email sent"
        );
        Ok(())
    }
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn backend(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if message.to.is_empty() {
            return Err(AppError::validation("Email has no recipients"));
        }
        info!(
            to = ?message.to,
            subject = %message.subject,
            "Mail delivery disabled; email logged instead of sent"
        );
        Ok(())
    }
}

/// Choose the mail backend from configuration.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    if config.enabled {
        info!(host = %config.smtp_host, port = config.smtp_port, "Using SMTP mailer");
        Ok(Arc::new(SmtpMailer::from_config(config)?))
    } else {
        info!("Mail delivery disabled, using log mailer");
        Ok(Arc::new(LogMailer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &[&str]) -> EmailMessage {
        EmailMessage {
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "Reminder".into(),
            html: "<p>hi</p>".into(),
            text: "hi".into(),
        }
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_message() {
        let mailer = LogMailer;
        assert_eq!(mailer.backend(), "log");
        assert!(mailer.send(&message(&["a@example.com"])).await.is_ok());
        assert!(mailer.send(&message(&[])).await.is_err());
    }

    #[test]
    fn test_build_mailer_disabled_uses_log() {
        let mailer = build_mailer(&MailConfig::default()).unwrap();
        assert_eq!(mailer.backend(), "log");
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let config = MailConfig {
            from_address: "nope".into(),
            ..MailConfig::default()
        };
        assert!(SmtpMailer::from_config(&config).is_err());
    }
}
