//! Composes emails from stored templates and hands them to the mailer.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use staffhub_core::result::AppResult;
use staffhub_core::traits::{EmailMessage, Mailer};
use staffhub_database::repositories::EmailTemplateRepository;
use staffhub_entity::email_template::EmailTemplate;

use super::template::{render_html, render_text};

/// Built-in template used when no row exists in `email_templates`.
#[derive(Debug, Clone, Copy)]
pub struct FallbackTemplate {
    /// Subject line template.
    pub subject: &'static str,
    /// HTML body template.
    pub html: &'static str,
    /// Plain-text body template.
    pub text: &'static str,
}

/// A fully rendered email, not yet addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
}

impl RenderedEmail {
    /// Address the email.
    pub fn to(self, recipients: Vec<String>) -> EmailMessage {
        EmailMessage {
            to: recipients,
            subject: self.subject,
            html: self.html,
            text: self.text,
        }
    }
}

/// Render `template`, or `fallback` when there is no stored template.
pub fn compose(
    template: Option<&EmailTemplate>,
    fallback: &FallbackTemplate,
    vars: &Map<String, Value>,
    safe_keys: &[&str],
) -> RenderedEmail {
    let (subject, html, text) = match template {
        Some(t) => (
            t.subject.as_str(),
            t.body_html.as_str(),
            t.body_text.as_deref().unwrap_or(fallback.text),
        ),
        None => (fallback.subject, fallback.html, fallback.text),
    };
    RenderedEmail {
        subject: render_text(subject, vars),
        html: render_html(html, vars, safe_keys),
        text: render_text(text, vars),
    }
}

/// Template lookup plus delivery.
#[derive(Debug, Clone)]
pub struct EmailService {
    templates: Arc<EmailTemplateRepository>,
    mailer: Arc<dyn Mailer>,
}

impl EmailService {
    /// Creates a new email service.
    pub fn new(templates: Arc<EmailTemplateRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { templates, mailer }
    }

    /// Name of the delivery backend.
    pub fn backend(&self) -> &str {
        self.mailer.backend()
    }

    /// Render the template stored under `key`, falling back to the built-in
    /// one when the row is missing or cannot be loaded.
    pub async fn render(
        &self,
        key: &str,
        fallback: &FallbackTemplate,
        vars: &Map<String, Value>,
        safe_keys: &[&str],
    ) -> RenderedEmail {
        let template = match self.templates.find_by_key(key).await {
            Ok(template) => template,
            Err(e) => {
                warn!(template_key = key, error = %e, "Failed to load email template, using fallback");
                None
            }
        };
        compose(template.as_ref(), fallback, vars, safe_keys)
    }

    /// Deliver a message.
    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.mailer.send(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    const FALLBACK: FallbackTemplate = FallbackTemplate {
        subject: "Fallback {{name}}",
        html: "<p>{{name}}</p>",
        text: "text {{name}}",
    };

    fn vars() -> Map<String, Value> {
        match json!({"name": "<Ann>"}) {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_compose_uses_fallback_without_template() {
        let email = compose(None, &FALLBACK, &vars(), &[]);
        assert_eq!(email.subject, "Fallback <Ann>");
        assert_eq!(email.html, "<p>&lt;Ann&gt;</p>");
        assert_eq!(email.text, "text <Ann>");
    }

    #[test]
    fn test_compose_prefers_stored_template() {
        let stored = EmailTemplate {
            id: Uuid::new_v4(),
            template_key: "K".into(),
            subject: "Stored {{name}}".into(),
            body_html: "<b>{{name}}</b>".into(),
            body_text: None,
            updated_at: Utc::now(),
        };
        let email = compose(Some(&stored), &FALLBACK, &vars(), &[]);
        assert_eq!(email.subject, "Stored <Ann>");
        assert_eq!(email.html, "<b>&lt;Ann&gt;</b>");
        assert_eq!(email.text, "text <Ann>");

        let message = email.to(vec!["a@example.com".into()]);
        assert_eq!(message.to, vec!["a@example.com".to_string()]);
    }
}
