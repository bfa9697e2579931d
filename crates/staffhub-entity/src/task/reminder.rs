//! Reminder candidates: open tasks joined with their creator and assignee.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staffhub_core::types::TaskId;

use crate::schedule;

use super::model::REMINDER_FIELD;

/// A task that might need a reminder, with everything needed to send it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReminderCandidate {
    /// Task ID.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Due time as entered.
    pub due_time: Option<String>,
    /// Legacy reminder minutes.
    pub reminder_minutes: Option<i32>,
    /// Custom fields (may carry `Reminder`).
    pub custom_fields: serde_json::Value,
    /// Creator email.
    pub created_by_email: Option<String>,
    /// Creator name.
    pub created_by_name: Option<String>,
    /// Assignee email.
    pub assigned_to_email: Option<String>,
    /// Assignee name.
    pub assigned_to_name: Option<String>,
}

impl ReminderCandidate {
    /// Reminder lead time in minutes, or `None` when no reminder applies.
    ///
    /// A non-null `Reminder` custom field decides alone, even when it
    /// parses to nothing. Otherwise a positive legacy `reminder_minutes`
    /// is used. Lead times outside the schedulable range mean no reminder.
    pub fn reminder_minutes(&self) -> Option<i64> {
        let minutes = match self.custom_fields.get(REMINDER_FIELD) {
            Some(serde_json::Value::String(raw)) => schedule::parse_reminder_minutes(raw),
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::Null) | None => self
                .reminder_minutes
                .filter(|m| *m > 0)
                .map(i64::from),
            Some(_) => None,
        };
        minutes.filter(|m| schedule::reminder_offset(*m).is_some())
    }

    /// When the task is due, in UTC.
    pub fn due_at(&self) -> DateTime<Utc> {
        schedule::due_instant(self.due_date, self.due_time.as_deref())
    }

    /// Whether the reminder window has opened at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.reminder_minutes()
            .and_then(|minutes| {
                schedule::reminder_instant(self.due_date, self.due_time.as_deref(), minutes)
            })
            .is_some_and(|opens_at| opens_at <= now)
    }

    /// Distinct recipient addresses, compared case-insensitively, creator first.
    pub fn recipients(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut recipients = Vec::new();
        for email in [&self.created_by_email, &self.assigned_to_email]
            .into_iter()
            .flatten()
        {
            let email = email.trim();
            if email.is_empty() {
                continue;
            }
            let key = email.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                recipients.push(email.to_string());
            }
        }
        recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn candidate(custom_fields: serde_json::Value, legacy: Option<i32>) -> ReminderCandidate {
        ReminderCandidate {
            id: TaskId::new(),
            title: "Call back".into(),
            description: None,
            priority: "High".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            due_time: Some("2:00 PM".into()),
            reminder_minutes: legacy,
            custom_fields,
            created_by_email: Some("Owner@Example.com".into()),
            created_by_name: Some("Owner".into()),
            assigned_to_email: Some("owner@example.com".into()),
            assigned_to_name: Some("Owner".into()),
        }
    }

    #[test]
    fn test_custom_field_takes_precedence() {
        let c = candidate(json!({"Reminder": "2 hours"}), Some(15));
        assert_eq!(c.reminder_minutes(), Some(120));
    }

    #[test]
    fn test_custom_field_none_disables_legacy() {
        let c = candidate(json!({"Reminder": "None"}), Some(15));
        assert_eq!(c.reminder_minutes(), None);
    }

    #[test]
    fn test_legacy_minutes_used_without_custom_field() {
        assert_eq!(candidate(json!({}), Some(30)).reminder_minutes(), Some(30));
        assert_eq!(candidate(json!({"Reminder": null}), Some(30)).reminder_minutes(), Some(30));
        assert_eq!(candidate(json!({}), Some(0)).reminder_minutes(), None);
        assert_eq!(candidate(json!({}), None).reminder_minutes(), None);
    }

    #[test]
    fn test_is_due_window() {
        let c = candidate(json!({"Reminder": "1 day"}), None);
        // due 2024-05-02 14:00 UTC, window opens 2024-05-01 14:00 UTC
        let before = Utc.with_ymd_and_hms(2024, 5, 1, 13, 59, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap();
        assert!(!c.is_due(before));
        assert!(c.is_due(at));
    }

    #[test]
    fn test_never_due_without_reminder() {
        let c = candidate(json!({"Reminder": ""}), None);
        assert!(!c.is_due(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_oversized_reminder_is_never_due() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let c = candidate(json!({"Reminder": "999999999999 days"}), Some(15));
        assert_eq!(c.reminder_minutes(), None);
        assert!(!c.is_due(now));

        let c = candidate(json!({"Reminder": 9_000_000_000_000_000_i64}), None);
        assert_eq!(c.reminder_minutes(), None);
        assert!(!c.is_due(now));

        let c = candidate(json!({"Reminder": -30}), None);
        assert!(!c.is_due(now));

        let mut c = candidate(json!({}), Some(i32::MAX));
        c.due_date = NaiveDate::MIN;
        assert!(!c.is_due(now));
    }

    #[test]
    fn test_recipients_deduplicated_case_insensitively() {
        let c = candidate(json!({}), None);
        assert_eq!(c.recipients(), vec!["Owner@Example.com".to_string()]);

        let mut c = candidate(json!({}), None);
        c.assigned_to_email = Some("other@example.com".into());
        c.created_by_email = Some("  ".into());
        assert_eq!(c.recipients(), vec!["other@example.com".to_string()]);
    }
}
