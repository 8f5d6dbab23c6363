use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use pulsewatch_core::OperationId;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::services::LogRecord;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn hello(State(state): State<AppState>) -> ApiResult<Value> {
    let op = OperationId::new("DemoController.hello");
    state
        .interceptor()
        .intercept_async(&op, async {
            state.business().increment_active_users()?;
            state.business().record_login();
            Ok::<_, ApiError>(Json(json!({
                "message": "Hello, pulsewatch!",
                "timestamp": Utc::now().timestamp_millis(),
            })))
        })
        .await
}

pub async fn status(State(state): State<AppState>) -> ApiResult<Value> {
    let op = OperationId::new("DemoController.status");
    state
        .interceptor()
        .intercept_async(&op, async {
            Ok::<_, ApiError>(Json(json!({
                "status": "UP",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": Utc::now().timestamp_millis(),
            })))
        })
        .await
}

pub async fn list_logs(State(state): State<AppState>) -> ApiResult<Vec<LogRecord>> {
    let op = OperationId::new("LogController.getAllLogs");
    state
        .interceptor()
        .intercept_async(&op, async { Ok::<_, ApiError>(Json(state.logs().all_logs()?)) })
        .await
}

pub async fn generate_log(State(state): State<AppState>) -> ApiResult<Value> {
    let op = OperationId::new("LogController.generateLog");
    state
        .interceptor()
        .intercept_async(&op, async {
            let log = state.logs().create_random_log()?;
            Ok::<_, ApiError>(Json(json!({ "message": "log generated", "log": log })))
        })
        .await
}
