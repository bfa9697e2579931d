//! Task reminder engine.
//!
//! A scan loads open, dated, not-yet-reminded tasks, decides in process
//! which ones have entered their reminder window, and sends one email per
//! task to its creator and assignee. `reminder_sent_at` is recorded only
//! after a successful send, and only if no other run recorded it first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use staffhub_core::error::AppError;
use staffhub_core::types::TaskId;
use staffhub_database::repositories::TaskRepository;
use staffhub_entity::email_template::TASK_REMINDER;
use staffhub_entity::task::ReminderCandidate;

use crate::email::template::escape_html;
use crate::email::{EmailService, FallbackTemplate};

/// Placeholders whose values are pre-rendered HTML.
const SAFE_KEYS: &[&str] = &["task_link"];

/// Used when no `TASK_REMINDER` template is stored.
pub const REMINDER_FALLBACK: FallbackTemplate = FallbackTemplate {
    subject: "Reminder: {{task_title}} is due {{due_date}}",
    html: "<p>Hello {{recipient_name}},</p>\
           <p>This is a reminder that <strong>{{task_title}}</strong> \
           ({{priority}} priority) is due on {{due_date}} {{due_time}}.</p>\
           <p>{{task_description}}</p>\
           <p>{{task_link}}</p>",
    text: "Reminder: {{task_title}} is due on {{due_date}} {{due_time}}.\n{{task_url}}",
};

/// A task whose reminder window is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueReminder {
    /// Task ID.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// When the task is due.
    pub due_at: DateTime<Utc>,
    /// Lead time that opened the window.
    pub reminder_minutes: i64,
    /// Who will be emailed.
    pub recipients: Vec<String>,
}

/// A task whose reminder could not be delivered or recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderFailure {
    /// Task ID.
    pub task_id: TaskId,
    /// What went wrong.
    pub error: String,
}

/// Outcome of one reminder run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderRunSummary {
    /// Candidates loaded from the database.
    pub scanned: usize,
    /// Candidates whose window was open.
    pub due: usize,
    /// Reminders delivered.
    pub sent: usize,
    /// Due reminders not sent (already sent by another run, task gone, or no recipients).
    pub skipped: usize,
    /// Per-task errors.
    pub failures: Vec<ReminderFailure>,
}

enum Outcome {
    Sent,
    Skipped(&'static str),
}

/// Finds due reminders and delivers them.
#[derive(Debug, Clone)]
pub struct ReminderService {
    tasks: Arc<TaskRepository>,
    email: Arc<EmailService>,
    public_base_url: String,
}

impl ReminderService {
    /// Creates a new reminder service.
    pub fn new(
        tasks: Arc<TaskRepository>,
        email: Arc<EmailService>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            tasks,
            email,
            public_base_url: public_base_url.into(),
        }
    }

    /// Tasks whose reminder window is open at `now`, without sending anything.
    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<DueReminder>, AppError> {
        let (_, due) = self.due_candidates(now).await?;
        Ok(due
            .into_iter()
            .map(|c| DueReminder {
                task_id: c.id,
                title: c.title.clone(),
                due_at: c.due_at(),
                reminder_minutes: c.reminder_minutes().unwrap_or_default(),
                recipients: c.recipients(),
            })
            .collect())
    }

    /// Send every due reminder. Per-task errors are collected, not raised.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReminderRunSummary, AppError> {
        let (scanned, due) = self.due_candidates(now).await?;
        let mut summary = ReminderRunSummary {
            scanned,
            due: due.len(),
            ..Default::default()
        };

        for candidate in &due {
            match self.process(candidate, now).await {
                Ok(Outcome::Sent) => summary.sent += 1,
                Ok(Outcome::Skipped(reason)) => {
                    debug!(task_id = %candidate.id, reason, "Reminder skipped");
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(task_id = %candidate.id, error = %e, "Reminder failed");
                    summary.failures.push(ReminderFailure {
                        task_id: candidate.id,
                        error: e.message.clone(),
                    });
                }
            }
        }

        info!(
            scanned = summary.scanned,
            due = summary.due,
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failures.len(),
            "Task reminder run finished"
        );
        Ok(summary)
    }

    async fn due_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(usize, Vec<ReminderCandidate>), AppError> {
        let candidates = self.tasks.reminder_candidates().await?;
        let scanned = candidates.len();
        let due = candidates.into_iter().filter(|c| c.is_due(now)).collect();
        Ok((scanned, due))
    }

    async fn process(
        &self,
        candidate: &ReminderCandidate,
        now: DateTime<Utc>,
    ) -> Result<Outcome, AppError> {
        match self.tasks.reminder_sent_at(candidate.id).await? {
            None => return Ok(Outcome::Skipped("task no longer exists")),
            Some(Some(_)) => return Ok(Outcome::Skipped("already sent")),
            Some(None) => {}
        }

        let recipients = candidate.recipients();
        if recipients.is_empty() {
            return Ok(Outcome::Skipped("no recipients"));
        }

        let vars = reminder_vars(candidate, &self.public_base_url);
        let message = self
            .email
            .render(TASK_REMINDER, &REMINDER_FALLBACK, &vars, SAFE_KEYS)
            .await
            .to(recipients);
        self.email.send(&message).await?;

        if !self.tasks.mark_reminder_sent(candidate.id, now).await? {
            warn!(task_id = %candidate.id, "Reminder was recorded by a concurrent run");
        }
        info!(task_id = %candidate.id, recipients = message.to.len(), "Task reminder sent");
        Ok(Outcome::Sent)
    }
}

/// Template variables for a reminder email.
pub fn reminder_vars(candidate: &ReminderCandidate, public_base_url: &str) -> Map<String, Value> {
    let task_url = format!(
        "{}/tasks/{}",
        public_base_url.trim_end_matches('/'),
        candidate.id
    );
    let recipient_name = candidate
        .assigned_to_name
        .clone()
        .or_else(|| candidate.created_by_name.clone())
        .unwrap_or_else(|| "there".to_string());

    let vars = json!({
        "task_title": candidate.title,
        "task_description": candidate.description,
        "priority": candidate.priority,
        "due_date": candidate.due_date.format("%Y-%m-%d").to_string(),
        "due_time": candidate.due_time.clone().unwrap_or_default(),
        "reminder_minutes": candidate.reminder_minutes(),
        "recipient_name": recipient_name,
        "task_url": task_url,
        "task_link": format!(
            "<a href=\"{}\">View task</a>",
            escape_html(&task_url)
        ),
    });
    match vars {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::email::service::compose;

    fn candidate() -> ReminderCandidate {
        ReminderCandidate {
            id: TaskId::new(),
            title: "Send <offer>".into(),
            description: Some("Prepare the letter".into()),
            priority: "High".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            due_time: Some("14:00".into()),
            reminder_minutes: Some(60),
            custom_fields: json!({}),
            created_by_email: Some("lead@example.com".into()),
            created_by_name: Some("Lead".into()),
            assigned_to_email: None,
            assigned_to_name: None,
        }
    }

    #[test]
    fn test_reminder_vars() {
        let c = candidate();
        let vars = reminder_vars(&c, "https://app.example.com/");
        assert_eq!(vars["due_date"], "2024-05-02");
        assert_eq!(vars["recipient_name"], "Lead");
        assert_eq!(vars["reminder_minutes"], 60);
        assert_eq!(
            vars["task_url"],
            format!("https://app.example.com/tasks/{}", c.id)
        );
    }

    #[test]
    fn test_fallback_email_escapes_title_but_keeps_link() {
        let c = candidate();
        let vars = reminder_vars(&c, "https://app.example.com");
        let email = compose(None, &REMINDER_FALLBACK, &vars, SAFE_KEYS);
        assert!(email.html.contains("Send &lt;offer&gt;"));
        assert!(email.html.contains("<a href=\"https://app.example.com/tasks/"));
        assert_eq!(email.subject, "Reminder: Send <offer> is due 2024-05-02");
    }

    #[test]
    fn test_summary_serializes_expected_shape() {
        let summary = ReminderRunSummary {
            scanned: 3,
            due: 2,
            sent: 1,
            skipped: 0,
            failures: vec![ReminderFailure {
                task_id: TaskId::new(),
                error: "smtp down".into(),
            }],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["scanned"], 3);
        assert_eq!(value["failures"][0]["error"], "smtp down");
    }
}
