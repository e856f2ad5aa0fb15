use crate::coordinator::CoordinatorHandle;
use crate::server::routes::{patches, webhook};

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub coordinator: CoordinatorHandle,
    /// Upstream changelog URL; doubles as the link base for served items.
    pub source_url: Arc<str>,
    pub feed_title: Arc<str>,
}

impl AppState {
    pub fn new(coordinator: CoordinatorHandle, source_url: &str, feed_title: &str) -> Self {
        Self {
            coordinator,
            source_url: Arc::from(source_url),
            feed_title: Arc::from(feed_title),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let start = Instant::now();
    let resp = next.run(req).await;

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(
            "| {:>3} | {:^7} | {} | {}ms",
            status.as_u16(),
            method.as_str(),
            path,
            latency_ms
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {:^7} | {} | {}ms",
            status.as_u16(),
            method.as_str(),
            path,
            latency_ms
        );
    } else {
        info!(
            "| {:>3} | {:^7} | {} | {}ms",
            status.as_u16(),
            method.as_str(),
            path,
            latency_ms
        );
    }

    resp
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/patches", get(patches::feed_handler))
        .route("/patches/json", get(patches::json_handler))
        .route("/patches/pull", get(patches::pull_handler))
        .route("/lingr", post(webhook::lingr_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
