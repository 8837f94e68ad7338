//! Shared helpers for API integration tests.
//!
//! Tests run the full production router (same middleware stack as
//! `main.rs`) against the in-memory stores, so every request exercises
//! auth, role gates, and the workflow engine end to end.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use sitedesk_api::auth::session::SessionStore;
use sitedesk_api::config::ServerConfig;
use sitedesk_api::router::build_app_router;
use sitedesk_api::state::AppState;
use sitedesk_api::ws::WsManager;
use sitedesk_db::memory::{InMemoryDprStore, InMemoryIndentStore};
use sitedesk_events::{DriveSyncWorker, EventBus};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: "target/test-uploads".to_string(),
        archiver_url: None,
    }
}

/// Build the full application router backed by fresh in-memory stores.
///
/// Spawns the drive-sync worker (endpoint disabled) so archive manifests
/// can be queued; the task ends with the test runtime.
pub fn build_test_app() -> Router {
    let config = test_config();
    let (sync_worker, sync_queue) = DriveSyncWorker::new(None);
    tokio::spawn(sync_worker.run(tokio_util::sync::CancellationToken::new()));

    let state = AppState {
        indents: Arc::new(InMemoryIndentStore::new()),
        dprs: Arc::new(InMemoryDprStore::new()),
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionStore::new()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        sync_queue,
    };

    build_app_router(state, &config)
}

/// Fire a GET without authentication.
#[allow(dead_code)]
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Fire a GET with a bearer token.
#[allow(dead_code)]
pub async fn get_authed(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Fire a POST with a JSON body and optional bearer token.
#[allow(dead_code)]
pub async fn post_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Collect the response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in with the static directory credentials and return the session token.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login must succeed");
    let json = body_json(response).await;
    json["token"].as_str().expect("token in response").to_string()
}
