//! pulsewatch core: in-process metrics registry, instrumentation interceptor,
//! and health aggregation.
//!
//! This crate holds the measurement engine shared by the gateway and any
//! embedding application. It carries no HTTP or transport dependencies; the
//! scrape and health surfaces live in `pulsewatch-gateway`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Misuse surfaces as `PulseError`; a broken sampler or health check is
//! isolated instead of taking down a scrape.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod health;
pub mod identity;
pub mod interceptor;
pub mod metrics;
pub mod registry;

/// Shared result type.
pub use error::{ErrorCode, PulseError, Result};
pub use health::{CompositeHealth, Health, HealthAggregator, HealthCheck, Status};
pub use identity::MetricIdentity;
pub use interceptor::{FailureKind, Interceptor, InterceptorNames, OperationId};
pub use metrics::{Counter, Gauge, MetricKind, Sampler, Timer, TimerSnapshot};
pub use registry::{Description, Metric, MetricRegistry, MetricSample, MetricValue};
