//! Axum router wiring.
//!
//! Ops routes (scrape + health) are served as-is; `/api/*` demo routes run
//! through the interceptor inside their handlers.

use axum::{routing::get, Router};

use crate::{api::demo, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route("/metrics/snapshot", get(ops::metrics_snapshot))
        .route("/api/hello", get(demo::hello))
        .route("/api/status", get(demo::status))
        .route("/api/logs", get(demo::list_logs))
        .route("/api/logs/generate", get(demo::generate_log))
        .with_state(state)
}
