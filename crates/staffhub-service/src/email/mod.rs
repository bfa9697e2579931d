//! Email delivery and templating.

pub mod mailer;
pub mod service;
pub mod template;

pub use mailer::{LogMailer, SmtpMailer, build_mailer};
pub use service::{EmailService, FallbackTemplate, RenderedEmail};
