//! Demo business endpoints and their HTTP error mapping.
//!
//! Every handler runs inside the interceptor under its logical name, so the
//! `api.*` metrics cover them without the handlers knowing.

pub mod demo;

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use pulsewatch_core::{ErrorCode, FailureKind, PulseError};

/// HTTP-facing wrapper around [`PulseError`].
#[derive(Debug)]
pub struct ApiError(pub PulseError);

impl From<PulseError> for ApiError {
    fn from(e: PulseError) -> Self {
        Self(e)
    }
}

impl FailureKind for ApiError {
    fn failure_kind(&self) -> Cow<'static, str> {
        self.0.failure_kind()
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest
        | ErrorCode::InvalidDelta
        | ErrorCode::InvalidDuration
        | ErrorCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ErrorCode::KindConflict | ErrorCode::ReadOnlyGauge => StatusCode::CONFLICT,
        ErrorCode::CheckEvaluation => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let body = json!({ "code": code.as_str(), "message": self.0.to_string() });
        (status_for(code), Json(body)).into_response()
    }
}
