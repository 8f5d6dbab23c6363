//! Shared error type across pulsewatch crates.

use thiserror::Error;

use crate::metrics::MetricKind;

/// Stable error codes (used in HTTP bodies and as failure-kind labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Identity already registered under another metric kind.
    KindConflict,
    /// Negative counter delta.
    InvalidDelta,
    /// Negative timer duration.
    InvalidDuration,
    /// Write to a sampler-backed gauge.
    ReadOnlyGauge,
    /// Health check could not evaluate.
    CheckEvaluation,
    /// Invalid input / malformed config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::KindConflict => "KIND_CONFLICT",
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::InvalidDuration => "INVALID_DURATION",
            ErrorCode::ReadOnlyGauge => "READ_ONLY_GAUGE",
            ErrorCode::CheckEvaluation => "CHECK_EVALUATION",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PulseError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("metric {identity} is a {existing}, requested as {requested}")]
    KindConflict {
        identity: String,
        existing: MetricKind,
        requested: MetricKind,
    },
    #[error("counter delta must be >= 0, got {0}")]
    InvalidDelta(i64),
    #[error("timer duration must be >= 0, got {0}ns")]
    InvalidDuration(i64),
    #[error("gauge {0} is sampler-backed and cannot be set")]
    ReadOnlyGauge(String),
    #[error("health check failed: {0}")]
    CheckEvaluation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PulseError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PulseError::KindConflict { .. } => ErrorCode::KindConflict,
            PulseError::InvalidDelta(_) => ErrorCode::InvalidDelta,
            PulseError::InvalidDuration(_) => ErrorCode::InvalidDuration,
            PulseError::ReadOnlyGauge(_) => ErrorCode::ReadOnlyGauge,
            PulseError::CheckEvaluation(_) => ErrorCode::CheckEvaluation,
            PulseError::BadRequest(_) => ErrorCode::BadRequest,
            PulseError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            PulseError::Internal(_) => ErrorCode::Internal,
        }
    }
}
