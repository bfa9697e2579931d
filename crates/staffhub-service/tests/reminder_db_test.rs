//! Reminder runs against a real database with a scripted mailer. Each test
//! gets a fresh, migrated database from `sqlx::test` (requires
//! `DATABASE_URL`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;
use staffhub_core::traits::{EmailMessage, Mailer};
use staffhub_database::repositories::{EmailTemplateRepository, TaskRepository};
use staffhub_service::email::EmailService;
use staffhub_service::task::ReminderService;

/// Fails for `fail@example.com`. When it delivers to `ok@example.com` it
/// also records the reminder of `preempt` directly, standing in for a
/// concurrent run that got there first.
#[derive(Debug)]
struct ScriptedMailer {
    pool: PgPool,
    preempt: Option<Uuid>,
    delivered: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for ScriptedMailer {
    fn backend(&self) -> &str {
        "scripted"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if message.to.iter().any(|to| to == "fail@example.com") {
            return Err(AppError::external_service("relay rejected recipient"));
        }
        if message.to.iter().any(|to| to == "ok@example.com") {
            if let Some(id) = self.preempt {
                sqlx::query("UPDATE tasks SET reminder_sent_at = NOW() WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .expect("preempt reminder");
            }
        }
        self.delivered
            .lock()
            .expect("delivered lock")
            .push(message.clone());
        Ok(())
    }
}

async fn insert_user(pool: &PgPool, name: &str, email: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("insert user")
}

/// A task due `days` from today with a five-day reminder, so its window
/// is already open.
async fn insert_task(pool: &PgPool, title: &str, creator: Uuid, days: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO tasks (title, created_by, due_date, due_time, custom_fields) \
         VALUES ($1, $2, CURRENT_DATE + $3, '09:00', '{\"Reminder\": \"5 days\"}'::jsonb) \
         RETURNING id",
    )
    .bind(title)
    .bind(creator)
    .bind(days)
    .fetch_one(pool)
    .await
    .expect("insert task")
}

async fn reminder_sent_at(pool: &PgPool, id: Uuid) -> Option<DateTime<Utc>> {
    sqlx::query_scalar("SELECT reminder_sent_at FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("reminder_sent_at")
}

fn service(pool: &PgPool, mailer: Arc<ScriptedMailer>) -> ReminderService {
    let email = EmailService::new(
        Arc::new(EmailTemplateRepository::new(pool.clone())),
        mailer,
    );
    ReminderService::new(
        Arc::new(TaskRepository::new(pool.clone())),
        Arc::new(email),
        "https://staffhub.test",
    )
}

#[sqlx::test(migrations = "../../migrations")]
async fn run_sends_collects_failures_and_skips_preempted(pool: PgPool) {
    let ok_user = insert_user(&pool, "Olive", "ok@example.com").await;
    let failing_user = insert_user(&pool, "Fred", "fail@example.com").await;
    let other_user = insert_user(&pool, "Pat", "pat@example.com").await;

    // Candidates are processed in due-date order.
    let delivered_task = insert_task(&pool, "Call Acme", ok_user, 1).await;
    let failed_task = insert_task(&pool, "Chase invoice", failing_user, 2).await;
    let preempted_task = insert_task(&pool, "Send offer", other_user, 3).await;

    let mailer = Arc::new(ScriptedMailer {
        pool: pool.clone(),
        preempt: Some(preempted_task),
        delivered: Mutex::new(Vec::new()),
    });
    let summary = service(&pool, Arc::clone(&mailer))
        .run(Utc::now())
        .await
        .expect("run");

    assert_eq!(summary.scanned, 3);
    assert_eq!(summary.due, 3);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].task_id.into_uuid(), failed_task);
    assert!(summary.failures[0].error.contains("relay rejected"));

    assert!(reminder_sent_at(&pool, delivered_task).await.is_some());
    assert!(reminder_sent_at(&pool, failed_task).await.is_none());

    let delivered = mailer.delivered.lock().expect("delivered lock");
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to, vec!["ok@example.com".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_reminder_is_retried_on_the_next_run(pool: PgPool) {
    let user = insert_user(&pool, "Fred", "fail@example.com").await;
    let task = insert_task(&pool, "Chase invoice", user, 1).await;

    let mailer = Arc::new(ScriptedMailer {
        pool: pool.clone(),
        preempt: None,
        delivered: Mutex::new(Vec::new()),
    });
    let reminders = service(&pool, mailer);

    let first = reminders.run(Utc::now()).await.expect("first run");
    assert_eq!(first.failures.len(), 1);
    assert!(reminder_sent_at(&pool, task).await.is_none());

    sqlx::query("UPDATE users SET email = 'ok@example.com' WHERE id = $1")
        .bind(user)
        .execute(&pool)
        .await
        .expect("fix address");

    let second = reminders.run(Utc::now()).await.expect("second run");
    assert_eq!(second.sent, 1);
    assert!(second.failures.is_empty());
    assert!(reminder_sent_at(&pool, task).await.is_some());

    let third = reminders.run(Utc::now()).await.expect("third run");
    assert_eq!(third.scanned, 0);
    assert_eq!(third.sent, 0);
}
