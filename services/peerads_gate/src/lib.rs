pub mod api;
pub mod catalog;
pub mod error;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use error::AppError;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Max request body size: 1 MiB
const MAX_BODY_BYTES: usize = 1_048_576;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path prefix the SDK's default `api_url` ends with.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub ad_id: String,
    pub event: String,
    pub received_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DauReport {
    pub dau: u64,
    pub received_at: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub served: Arc<AtomicU64>,
    pub tracked: Arc<RwLock<Vec<TrackedEvent>>>,
    pub dau: Arc<RwLock<Vec<DauReport>>>,
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/ads/serve", post(api::serve))
        .route("/ads/track", post(api::track))
        .route("/apps/dau", post(api::dau));
    Router::new()
        .route("/healthz", get(healthz))
        .route("/debug/tracked", get(api::tracked))
        .nest(API_PREFIX, api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn(require_json_content_type))
        .with_state(state)
}

/// Rejects POST/PUT/PATCH requests without an application/json content-type.
async fn require_json_content_type(req: Request, next: Next) -> Response {
    let is_json = match req.method().as_str() {
        "POST" | "PUT" | "PATCH" => req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false),
        _ => true,
    };
    if !is_json {
        return AppError::unsupported_media_type().into_response();
    }
    next.run(req).await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

pub mod test {
    use super::AppState;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Spawn the server on a random port. Returns the address and a
    /// JoinHandle that keeps the server alive until dropped.
    pub async fn spawn() -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let (addr, handle, _) = spawn_with_state().await;
        (addr, handle)
    }

    /// Like [`spawn`], also returning the state so tests can inspect it.
    pub async fn spawn_with_state() -> (SocketAddr, tokio::task::JoinHandle<()>, AppState) {
        let state = AppState::default();
        let app = super::app_with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, handle, state)
    }
}
