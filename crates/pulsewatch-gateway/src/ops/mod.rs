//! Operational HTTP endpoints.
//!
//! - `/healthz`          : liveness
//! - `/health`           : composite health (503 when DOWN)
//! - `/metrics`          : Prometheus text format
//! - `/metrics/snapshot` : logical snapshot as JSON

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use pulsewatch_core::{Description, MetricKind, MetricSample, MetricValue};

use crate::app_state::AppState;
use crate::obs::prometheus;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn health(State(state): State<AppState>) -> Response {
    let composite = state.health().check().await;
    let code = if composite.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(composite)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = prometheus::render(&state.registry().snapshot());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, prometheus::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

/// One scraped metric: `{name, labels, kind, value, description?}`.
#[derive(Debug, Serialize)]
pub struct ScrapeEntry<'a> {
    pub name: &'a str,
    pub labels: &'a [(String, String)],
    pub kind: MetricKind,
    pub value: &'a MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a Description>,
}

impl<'a> From<&'a MetricSample> for ScrapeEntry<'a> {
    fn from(s: &'a MetricSample) -> Self {
        Self {
            name: s.identity.name(),
            labels: s.identity.labels(),
            kind: s.kind,
            value: &s.value,
            description: s.description.as_ref(),
        }
    }
}

pub async fn metrics_snapshot(State(state): State<AppState>) -> Response {
    let snapshot = state.registry().snapshot();
    let entries: Vec<ScrapeEntry<'_>> = snapshot.iter().map(ScrapeEntry::from).collect();
    (StatusCode::OK, Json(entries)).into_response()
}
