#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stockroom_api::config::ServerConfig;
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState { pool }, &test_config())
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an asset through the API and return its id.
pub async fn create_asset(pool: &PgPool, tag: &str, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/assets",
        serde_json::json!({ "asset_tag": tag, "name": name, "category": "laptop" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a borrower through the API and return its id.
pub async fn create_borrower(pool: &PgPool, full_name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/borrowers",
        serde_json::json!({ "full_name": full_name, "department": "Finance" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Fetch an asset's current status label.
pub async fn asset_status(pool: &PgPool, asset_id: i64) -> String {
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}"),
    )
    .await;
    body_json(response).await["data"]["status"]
        .as_str()
        .unwrap()
        .to_string()
}
