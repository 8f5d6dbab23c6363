#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use pulsewatch_core::health::check_fn;
use pulsewatch_core::{Health, HealthAggregator};
use pulsewatch_gateway::app_state::AppState;
use pulsewatch_gateway::config;
use pulsewatch_gateway::router::build_router;

fn app(up: bool) -> Router {
    let cfg = config::load_from_str("version: 1\nsamples:\n  seed_records: 3\n").expect("config");
    let health = HealthAggregator::new().with_check(
        "fixed",
        Arc::new(check_fn(move || Ok(if up { Health::up() } else { Health::down() }))),
    );
    build_router(AppState::with_health(cfg, health).expect("state"))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).expect("json body"))
}

#[tokio::test]
async fn healthz_is_plain_ok() {
    let (status, body) = get(&app(true), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn health_reports_up_with_components() {
    let (status, body) = get_json(&app(true), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["components"]["fixed"]["status"], "UP");
}

#[tokio::test]
async fn health_down_is_503() {
    let (status, body) = get_json(&app(false), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["components"]["fixed"]["status"], "DOWN");
}

#[tokio::test]
async fn hello_is_intercepted_and_scraped() {
    let app = app(true);
    let (status, body) = get_json(&app, "/api/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello, pulsewatch!");

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let text = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();

    assert!(text.contains("api_calls_total{api=\"DemoController.hello\"} 1\n"));
    assert!(text.contains("api_response_time_seconds_count{api=\"DemoController.hello\"} 1\n"));
    assert!(text.contains("business_operations_total{type=\"login\"} 1\n"));
    assert!(text.contains("business_users_active 1\n"));
    assert!(text.contains("business_system_status 1\n"));
    assert!(text.contains("# TYPE process_uptime_seconds gauge\n"));
    assert!(text.contains("# TYPE process_memory_resident_bytes gauge\n"));
    assert!(text.contains("# HELP api_calls_total API call count\n# TYPE api_calls_total counter\n"));
    assert!(text.contains("# HELP business_users_active Currently active users\n"));
    assert!(!text.contains("api_errors_total"));
}

#[tokio::test]
async fn status_reports_up() {
    let (status, body) = get_json(&app(true), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn logs_are_seeded_and_generated() {
    let app = app(true);

    let (status, logs) = get_json(&app, "/api/logs").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = logs
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, generated) = get_json(&app, "/api/logs/generate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["log"]["id"], 4);

    let (_, logs) = get_json(&app, "/api/logs").await;
    assert_eq!(logs.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn snapshot_lists_every_metric_as_json() {
    let app = app(true);
    let _ = get(&app, "/api/logs/generate").await;

    let (status, body) = get_json(&app, "/metrics/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();

    let records = entries
        .iter()
        .find(|e| e["name"] == "logstore.records")
        .expect("logstore gauge");
    assert_eq!(records["kind"], "gauge");
    assert_eq!(records["value"], 4.0);
    assert_eq!(records["description"]["help"], "Log records held by the store");

    let calls = entries
        .iter()
        .find(|e| e["name"] == "api.calls")
        .expect("api.calls");
    assert_eq!(calls["kind"], "counter");
    assert_eq!(calls["labels"][0][0], "api");
    assert_eq!(calls["labels"][0][1], "LogController.generateLog");
    assert_eq!(calls["value"], 1);

    let timer = entries
        .iter()
        .find(|e| e["name"] == "api.response.time")
        .expect("timer");
    assert_eq!(timer["kind"], "timer");
    assert_eq!(timer["value"]["count"], 1);
}
