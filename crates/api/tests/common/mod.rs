use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use mediashift_api::config::ServerConfig;
use mediashift_api::router::build_app_router;
use mediashift_api::state::AppState;
use mediashift_events::EventBus;
use mediashift_world::{FixedAssetProbe, MemoryWorldStore};

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
        world_api_url: "http://localhost:30000".to_string(),
        asset_base_url: "http://localhost:30000".to_string(),
        store_timeout_secs: 30,
        probe_timeout_secs: 10,
    }
}

/// Build an `AppState` around an in-memory world.
///
/// Returned separately from the router so tests can reach the state (for
/// example to hold the run guard or inspect the store).
pub fn test_state(store: Arc<MemoryWorldStore>, probe: Arc<FixedAssetProbe>) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        store,
        probe,
        bus: Arc::new(EventBus::default()),
        run_guard: Arc::new(tokio::sync::Mutex::new(())),
        shutdown: CancellationToken::new(),
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with an empty body against the app.
pub async fn post(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
