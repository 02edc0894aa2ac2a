#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower::ServiceExt;

use kanban_board::api::{create_router, AppState};
use kanban_board::config::Config;
use kanban_board::infrastructure::db;

pub async fn setup_test_db() -> SqlitePool {
    db::init_db("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database")
}

pub fn test_config(max_cards_per_column: usize) -> Config {
    Config {
        port: 3000,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        cors_origin: "http://localhost:5173".to_string(),
        max_cards_per_column,
    }
}

pub async fn setup_app() -> (Router, broadcast::Receiver<String>) {
    setup_app_with_limit(100).await
}

pub async fn setup_app_with_limit(max_cards_per_column: usize) -> (Router, broadcast::Receiver<String>) {
    let pool = setup_test_db().await;
    let (sse_tx, sse_rx) = broadcast::channel(100);
    let config = Arc::new(test_config(max_cards_per_column));

    let state = AppState::new(Some(pool), sse_tx, config.clone());
    (create_router(state, &config), sse_rx)
}

pub async fn make_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri).method(method);

    if body.is_some() {
        request = request.header("content-type", "application/json");
    }

    let request = request
        .body(Body::from(body.unwrap_or_default()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    (status, body_str)
}

pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, body) =
        make_request(app.clone(), method, uri, body.map(|b| b.to_string())).await;
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&body).unwrap()
    };
    (status, value)
}
