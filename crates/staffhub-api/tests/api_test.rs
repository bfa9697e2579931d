//! Router-level tests that exercise actor extraction, validation, and role
//! checks. The pool connects lazily, so none of these requests reach a
//! database.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use staffhub_api::{AppState, build_app};
use staffhub_core::config::AppConfig;
use staffhub_database::DatabasePool;

fn test_app() -> Router {
    let config = AppConfig::default();
    let pool = DatabasePool::connect_lazy(&config.database)
        .expect("lazy pool")
        .into_pool();
    let state = AppState::build(config, pool).expect("state");
    build_app(state)
}

fn request(method: Method, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder
            .header("x-user-id", Uuid::new_v4().to_string())
            .header("x-user-role", role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_returns_ok_without_actor() {
    let app = test_app();
    let (status, body) = send(&app, request(Method::GET, "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
}

#[tokio::test]
async fn missing_actor_headers_are_unauthorized() {
    let app = test_app();
    let (status, body) = send(&app, request(Method::GET, "/api/organizations", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("UNAUTHORIZED"));
}

#[tokio::test]
async fn unknown_role_is_unauthorized() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request(Method::GET, "/api/tasks", Some("superuser"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_user_id_is_unauthorized() {
    let app = test_app();
    let req = Request::builder()
        .uri("/api/tasks")
        .header("x-user-id", "not-a-uuid")
        .header("x-user-role", "admin")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn transfer_with_same_source_and_target_is_rejected() {
    let app = test_app();
    let id = Uuid::new_v4();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/hiring-manager-transfers",
            Some("recruiter"),
            Some(json!({ "sourceHiringManagerId": id, "targetHiringManagerId": id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn transfer_without_ids_is_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/hiring-manager-transfers",
            Some("recruiter"),
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_manager_cannot_approve_transfer() {
    let app = test_app();
    for role in ["viewer", "recruiter"] {
        let uri = format!("/api/hiring-manager-transfers/{}/approve", Uuid::new_v4());
        let (status, body) = send(&app, request(Method::POST, &uri, Some(role), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {role}");
        assert_eq!(body["error"], json!("FORBIDDEN"));
    }
}

#[tokio::test]
async fn non_manager_cannot_deny_transfer() {
    let app = test_app();
    let uri = format!("/api/hiring-manager-transfers/{}/deny", Uuid::new_v4());
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some("viewer"),
            Some(json!({ "reason": "duplicate" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn denial_requires_reason() {
    let app = test_app();
    let uri = format!("/api/hiring-manager-transfers/{}/deny", Uuid::new_v4());
    for body in [json!({}), json!({ "reason": "   " })] {
        let (status, _) = send(
            &app,
            request(Method::POST, &uri, Some("manager"), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn invalid_path_id_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/hiring-manager-transfers/abc/approve",
            Some("admin"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn reminder_run_requires_manager() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/tasks/reminders/run", Some("recruiter"), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_management_requires_admin() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/users",
            Some("manager"),
            Some(json!({ "name": "Ann", "email": "ann@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_user_validates_fields() {
    let app = test_app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/users",
            Some("admin"),
            Some(json!({ "name": "", "email": "not-an-email" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn create_team_requires_name() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/teams",
            Some("recruiter"),
            Some(json!({ "name": "" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_task_rejects_unschedulable_reminder() {
    let app = test_app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/tasks",
            Some("recruiter"),
            Some(json!({
                "title": "Follow up",
                "dueDate": "2024-05-02",
                "customFields": { "Reminder": "999999999999 days" },
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}
