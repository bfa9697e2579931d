//! Job executor: dispatches scheduled tasks to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use staffhub_core::error::AppError;
use staffhub_entity::scheduled_task::ScheduledTask;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The `task_type` this handler processes
    fn task_type(&self) -> &str;

    /// Execute the task, returning a JSON summary for the log
    async fn execute(&self, task: &ScheduledTask) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Classify a service error: server-side failures are worth retrying,
    /// caller-side ones (missing rows, bad input) are not.
    pub fn from_service(err: AppError) -> Self {
        if err.kind.is_server_error() {
            Self::Transient(err.to_string())
        } else {
            Self::Permanent(err.to_string())
        }
    }
}

/// Dispatches tasks to the appropriate handler based on `task_type`
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create an executor with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let task_type = handler.task_type().to_string();
        tracing::info!(task_type = %task_type, "Registered job handler");
        self.handlers.insert(task_type, handler);
    }

    /// Execute a task by dispatching to its handler
    pub async fn execute(&self, task: &ScheduledTask) -> Result<Value, JobExecutionError> {
        let handler = self.handlers.get(&task.task_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for task type '{}'",
                task.task_type
            ))
        })?;

        tracing::info!(
            task_id = %task.id,
            task_type = %task.task_type,
            attempt = task.attempts,
            max_attempts = task.max_attempts,
            "Executing scheduled task"
        );

        handler.execute(task).await
    }

    /// Execute a task on its own tokio task so a panicking handler is
    /// reported as a permanent failure instead of leaving the row claimed.
    pub async fn execute_isolated(
        self: &Arc<Self>,
        task: &ScheduledTask,
    ) -> Result<Value, JobExecutionError> {
        let executor = Arc::clone(self);
        let owned = task.clone();
        match tokio::spawn(async move { executor.execute(&owned).await }).await {
            Ok(outcome) => outcome,
            Err(join_err) if join_err.is_panic() => Err(JobExecutionError::Permanent(format!(
                "Handler for '{}' panicked",
                task.task_type
            ))),
            Err(join_err) => Err(JobExecutionError::Permanent(format!(
                "Handler for '{}' was cancelled: {join_err}",
                task.task_type
            ))),
        }
    }

    /// Check if a handler is registered for a task type
    pub fn has_handler(&self, task_type: &str) -> bool {
        self.handlers.contains_key(task_type)
    }

    /// Registered task types, sorted
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use staffhub_entity::scheduled_task::ScheduledTaskStatus;
    use uuid::Uuid;

    #[derive(Debug)]
    struct EchoHandler;

    #[async_trait]
    impl JobHandler for EchoHandler {
        fn task_type(&self) -> &str {
            "echo"
        }

        async fn execute(&self, task: &ScheduledTask) -> Result<Value, JobExecutionError> {
            Ok(task.payload.clone())
        }
    }

    #[derive(Debug)]
    struct PanicHandler;

    #[async_trait]
    impl JobHandler for PanicHandler {
        fn task_type(&self) -> &str {
            "boom"
        }

        async fn execute(&self, _task: &ScheduledTask) -> Result<Value, JobExecutionError> {
            panic!("handler blew up");
        }
    }

    fn task(task_type: &str) -> ScheduledTask {
        let now = Utc::now();
        ScheduledTask {
            id: Uuid::new_v4(),
            task_type: task_type.to_string(),
            payload: json!({"task_type": task_type, "n": 1}),
            status: ScheduledTaskStatus::Running,
            scheduled_for: now,
            attempts: 1,
            max_attempts: 3,
            last_error: None,
            worker_id: Some("test".into()),
            started_at: Some(now),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_dispatches_to_registered_handler() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(EchoHandler));
        assert!(executor.has_handler("echo"));
        assert_eq!(executor.registered_types(), vec!["echo".to_string()]);

        let result = executor.execute(&task("echo")).await.unwrap();
        assert_eq!(result["n"], 1);
    }

    #[tokio::test]
    async fn test_isolated_panic_becomes_permanent_failure() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(PanicHandler));
        executor.register(Arc::new(EchoHandler));
        let executor = Arc::new(executor);

        let err = executor.execute_isolated(&task("boom")).await.unwrap_err();
        match err {
            JobExecutionError::Permanent(msg) => assert!(msg.contains("panicked")),
            other => panic!("unexpected error: {other:?}"),
        }

        let result = executor.execute_isolated(&task("echo")).await.unwrap();
        assert_eq!(result["n"], 1);
    }

    #[tokio::test]
    async fn test_unknown_type_is_permanent() {
        let executor = JobExecutor::new();
        let err = executor.execute(&task("nope")).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }

    #[test]
    fn test_service_error_classification() {
        assert!(matches!(
            JobExecutionError::from_service(AppError::database("connection reset")),
            JobExecutionError::Transient(_)
        ));
        assert!(matches!(
            JobExecutionError::from_service(AppError::not_found("gone")),
            JobExecutionError::Permanent(_)
        ));
    }
}
