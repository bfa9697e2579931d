//! Transfer decisions against a real database. Each test gets a fresh,
//! migrated database from `sqlx::test` (requires `DATABASE_URL`).

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use staffhub_api::{AppState, build_app};
use staffhub_core::config::AppConfig;

struct Seed {
    manager_id: Uuid,
    source_id: Uuid,
    target_id: Uuid,
}

async fn seed(pool: &PgPool) -> Seed {
    let manager_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, role) VALUES ('Mia Manager', 'mia@example.com', 'manager') \
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("insert manager");

    let org_id: Uuid = sqlx::query_scalar(
        "INSERT INTO organizations (name, created_by) VALUES ('Acme', $1) RETURNING id",
    )
    .bind(manager_id)
    .fetch_one(pool)
    .await
    .expect("insert organization");

    let mut ids = Vec::new();
    for (first, last) in [("Sam", "Source"), ("Tia", "Target")] {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO hiring_managers (first_name, last_name, organization_id, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(first)
        .bind(last)
        .bind(org_id)
        .bind(manager_id)
        .fetch_one(pool)
        .await
        .expect("insert hiring manager");
        ids.push(id);
    }

    Seed {
        manager_id,
        source_id: ids[0],
        target_id: ids[1],
    }
}

fn app(pool: PgPool) -> Router {
    let state = AppState::build(AppConfig::default(), pool).expect("state");
    build_app(state)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Uuid,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .header("x-user-role", "manager");
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn request_transfer(app: &Router, seed: &Seed) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/hiring-manager-transfers",
        seed.manager_id,
        Some(json!({
            "source_hiring_manager_id": seed.source_id,
            "target_hiring_manager_id": seed.target_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["data"]["status"], json!("pending"));
    body["data"]["id"].as_str().expect("transfer id").to_string()
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_approval_is_a_conflict(pool: PgPool) {
    let seed = seed(&pool).await;
    let app = app(pool.clone());
    let id = request_transfer(&app, &seed).await;
    let uri = format!("/api/hiring-manager-transfers/{id}/approve");

    let (status, body) = call(&app, Method::POST, &uri, seed.manager_id, None).await;
    assert_eq!(status, StatusCode::OK, "first approval failed: {body}");
    assert_eq!(body["data"]["transfer"]["status"], json!("approved"));

    let (status, body) = call(&app, Method::POST, &uri, seed.manager_id, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("CONFLICT"));
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("already been processed"))
    );

    let archived: String = sqlx::query_scalar("SELECT status FROM hiring_managers WHERE id = $1")
        .bind(seed.source_id)
        .fetch_one(&pool)
        .await
        .expect("source status");
    assert_eq!(archived, "Archived");
}

#[sqlx::test(migrations = "../../migrations")]
async fn denied_transfer_cannot_be_approved(pool: PgPool) {
    let seed = seed(&pool).await;
    let app = app(pool);
    let id = request_transfer(&app, &seed).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/hiring-manager-transfers/{id}/deny"),
        seed.manager_id,
        Some(json!({"reason": "Budget freeze"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "deny failed: {body}");
    assert_eq!(body["data"]["status"], json!("denied"));

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/hiring-manager-transfers/{id}/approve"),
        seed.manager_id,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn approving_unknown_transfer_is_not_found(pool: PgPool) {
    let seed = seed(&pool).await;
    let app = app(pool);
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/hiring-manager-transfers/{}/approve", Uuid::new_v4()),
        seed.manager_id,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("NOT_FOUND"));
}
