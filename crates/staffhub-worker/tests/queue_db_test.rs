//! Queue behavior against a real database. Each test gets a fresh,
//! migrated database from `sqlx::test` (requires `DATABASE_URL`).

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use staffhub_database::repositories::ScheduledTaskRepository;
use staffhub_entity::scheduled_task::ScheduledTaskPayload;
use staffhub_worker::TaskQueue;

fn queue(pool: &PgPool) -> TaskQueue {
    TaskQueue::new(Arc::new(ScheduledTaskRepository::new(pool.clone())), "test-worker")
        .with_stale_after(30)
}

/// A reminder scan claimed `minutes_ago` by a worker that never settled it.
async fn insert_running_scan(pool: &PgPool, minutes_ago: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO scheduled_tasks (task_type, status, attempts, worker_id, started_at) \
         VALUES ($1, 'running', 1, 'lost-worker', NOW() - make_interval(mins => $2)) \
         RETURNING id",
    )
    .bind(ScheduledTaskPayload::TaskReminderScan.task_type())
    .bind(minutes_ago)
    .fetch_one(pool)
    .await
    .expect("insert running task")
}

async fn status_of(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status::text FROM scheduled_tasks WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("status")
}

#[sqlx::test(migrations = "../../migrations")]
async fn abandoned_scan_is_reclaimed_and_cron_can_enqueue_again(pool: PgPool) {
    let stuck = insert_running_scan(&pool, 120).await;
    let queue = queue(&pool);

    let enqueued = queue
        .enqueue_unique(&ScheduledTaskPayload::TaskReminderScan, 3)
        .await
        .expect("enqueue");
    assert!(enqueued.is_some());

    assert_eq!(status_of(&pool, stuck).await, "failed");
    let last_error: Option<String> =
        sqlx::query_scalar("SELECT last_error FROM scheduled_tasks WHERE id = $1")
            .bind(stuck)
            .fetch_one(&pool)
            .await
            .expect("last_error");
    assert!(last_error.is_some_and(|e| e.contains("Abandoned")));
}

#[sqlx::test(migrations = "../../migrations")]
async fn recent_running_scan_still_blocks_duplicates(pool: PgPool) {
    let running = insert_running_scan(&pool, 1).await;
    let queue = queue(&pool);

    let enqueued = queue
        .enqueue_unique(&ScheduledTaskPayload::TaskReminderScan, 3)
        .await
        .expect("enqueue");
    assert!(enqueued.is_none());
    assert_eq!(status_of(&pool, running).await, "running");
    assert_eq!(queue.reclaim_stale().await.expect("reclaim"), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn claimed_task_is_settled_once(pool: PgPool) {
    let queue = queue(&pool);
    queue
        .enqueue_unique(&ScheduledTaskPayload::TaskReminderScan, 3)
        .await
        .expect("enqueue")
        .expect("first scan enqueued");

    let claimed = queue.dequeue().await.expect("dequeue").expect("claimed");
    assert_eq!(claimed.attempts, 1);
    assert!(queue.dequeue().await.expect("dequeue").is_none());

    queue.fail(claimed.id, "Handler for 'task_reminder_scan' panicked").await.expect("fail");
    assert_eq!(status_of(&pool, claimed.id).await, "failed");

    let next = queue
        .enqueue_unique(&ScheduledTaskPayload::TaskReminderScan, 3)
        .await
        .expect("enqueue");
    assert!(next.is_some());
}
