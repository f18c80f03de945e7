#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get as route_get};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use courier_api::config::ServerConfig;
use courier_api::engine::pipeline::RelayPipeline;
use courier_api::router::build_app_router;
use courier_api::state::AppState;
use courier_core::types::OwnerId;
use courier_db::{HistoryStore, MemoryStore};
use courier_history::HistoryRecorder;
use courier_relay::{HttpDispatcher, RelayConfig};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: None,
        history_queue_capacity: 64,
        relay: RelayConfig {
            timeout: Duration::from_secs(5),
            ..RelayConfig::default()
        },
    }
}

/// The production router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, a real
/// outbound dispatcher and a running history writer.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());

    let (recorder, _writer) =
        HistoryRecorder::spawn(Arc::clone(&store), config.history_queue_capacity);
    let dispatcher = HttpDispatcher::new(&config.relay).unwrap();

    let state = AppState {
        config: Arc::new(config.clone()),
        store: store.clone(),
        pipeline: Arc::new(RelayPipeline::new(Arc::new(dispatcher), recorder)),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    app.oneshot(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a raw body, for requests that are not valid JSON.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response {
    app.oneshot(
        Request::post(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Wait until the writer has stored `count` records for `owner`.
pub async fn wait_for_history(store: &MemoryStore, owner: &str, count: usize) {
    let owner = OwnerId::parse(Some(owner)).unwrap();
    for _ in 0..200 {
        if store.list_history(&owner, 100).await.unwrap().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("history for {owner} never reached {count} records");
}

// ---------------------------------------------------------------------------
// Local origin
// ---------------------------------------------------------------------------

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "contentType": headers.get("content-type").and_then(|v| v.to_str().ok()),
        "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn missing_user() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "no such user"})))
}

/// Start a remote origin on `127.0.0.1:0` and return its address.
pub async fn start_origin() -> SocketAddr {
    let app = Router::new()
        .route("/echo", any(echo))
        .route("/users", route_get(|| async { Json(json!([{"id": 1, "name": "ada"}])) }))
        .route("/users/404", route_get(missing_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
