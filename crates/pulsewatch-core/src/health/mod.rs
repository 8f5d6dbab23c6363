//! Health checks and their aggregation.
//!
//! A check is anything implementing [`HealthCheck`]; plain closures qualify via
//! [`check_fn`]. Thresholds belong to the individual checks, never to the
//! aggregator.

mod aggregator;
pub mod checks;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub use aggregator::{CompositeHealth, HealthAggregator};
pub use checks::{DiskSpaceCheck, DiskUsage, MemoryCheck, MemoryUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Result of one check: status plus structured detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: Status,
    pub details: BTreeMap<String, Value>,
}

impl Health {
    pub fn up() -> Self {
        Self::with_status(Status::Up)
    }

    pub fn down() -> Self {
        Self::with_status(Status::Down)
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }
}

/// Evaluate current status. Must be re-entrant: the aggregator may run a
/// check concurrently with itself and with every other check.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<Health>;
}

/// Adapter turning a closure into a [`HealthCheck`].
pub struct FnCheck<F>(F);

/// Use a synchronous closure as a health check.
pub fn check_fn<F>(f: F) -> FnCheck<F>
where
    F: Fn() -> Result<Health> + Send + Sync,
{
    FnCheck(f)
}

#[async_trait]
impl<F> HealthCheck for FnCheck<F>
where
    F: Fn() -> Result<Health> + Send + Sync,
{
    async fn check(&self) -> Result<Health> {
        (self.0)()
    }
}
