//! Metric kinds held by the registry.
//!
//! Every update path is a single atomic op or a short critical section, so
//! they are safe to call from hot request paths.

mod counter;
mod gauge;
mod timer;

use std::fmt;

use serde::Serialize;

pub use counter::Counter;
pub use gauge::{Gauge, Sampler};
pub use timer::{Timer, TimerSnapshot, BUCKETS_MICROS};

/// Tag for the three metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Timer,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
