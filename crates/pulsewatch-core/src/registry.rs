//! Metric registry backed by `DashMap`.
//!
//! Identities map to exactly one metric of one kind, and every identity sharing
//! a name shares that kind, so one name is always one exposition family.
//! Lookups on existing keys only take a shard read lock; creation goes through
//! `entry()` so racing first-writers on the same identity all observe the
//! single installed instance. Entries are never removed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::error::{PulseError, Result};
use crate::identity::MetricIdentity;
use crate::metrics::{Counter, Gauge, MetricKind, Sampler, Timer, TimerSnapshot};

/// Tagged handle to one registered metric.
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }
}

/// Current value(s) of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Counter(u64),
    /// NaN when the sampler failed.
    Gauge(f64),
    Timer(TimerSnapshot),
}

/// Help text and unit shared by every metric under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub help: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<String>,
}

impl Description {
    pub fn new(help: impl Into<String>) -> Self {
        Self {
            help: help.into(),
            base_unit: None,
        }
    }

    /// e.g. `bytes`, `seconds`.
    pub fn base_unit(mut self, unit: impl Into<String>) -> Self {
        self.base_unit = Some(unit.into());
        self
    }
}

/// One entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub identity: MetricIdentity,
    pub kind: MetricKind,
    pub value: MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
}

#[derive(Default)]
pub struct MetricRegistry {
    metrics: DashMap<MetricIdentity, Metric>,
    /// Kind claimed by the first metric created under each name.
    families: DashMap<String, MetricKind>,
    descriptions: DashMap<String, Description>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self {
            metrics: DashMap::new(),
            families: DashMap::new(),
            descriptions: DashMap::new(),
        }
    }

    /// Attach help text to every metric named `name`. The first description
    /// for a name wins; the one in effect is returned.
    pub fn describe(&self, name: &str, description: Description) -> Description {
        self.descriptions
            .entry(name.to_string())
            .or_insert(description)
            .value()
            .clone()
    }

    pub fn description(&self, name: &str) -> Option<Description> {
        self.descriptions.get(name).map(|d| d.value().clone())
    }

    pub fn get_or_create_counter(&self, identity: &MetricIdentity) -> Result<Arc<Counter>> {
        match self.get_or_insert(identity, MetricKind::Counter, || {
            Metric::Counter(Arc::new(Counter::new()))
        })? {
            Metric::Counter(c) => Ok(c),
            other => Err(conflict(identity, other.kind(), MetricKind::Counter)),
        }
    }

    /// Fetch or create a gauge. `sampler` only applies when this call creates it;
    /// without one the gauge is a settable cell starting at 0.
    pub fn get_or_create_gauge(
        &self,
        identity: &MetricIdentity,
        sampler: Option<Sampler>,
    ) -> Result<Arc<Gauge>> {
        let name = identity.to_string();
        match self.get_or_insert(identity, MetricKind::Gauge, move || {
            let gauge = match sampler {
                Some(s) => Gauge::sampled(name, s),
                None => Gauge::cell(name),
            };
            Metric::Gauge(Arc::new(gauge))
        })? {
            Metric::Gauge(g) => Ok(g),
            other => Err(conflict(identity, other.kind(), MetricKind::Gauge)),
        }
    }

    pub fn get_or_create_timer(&self, identity: &MetricIdentity) -> Result<Arc<Timer>> {
        match self.get_or_insert(identity, MetricKind::Timer, || {
            Metric::Timer(Arc::new(Timer::new()))
        })? {
            Metric::Timer(t) => Ok(t),
            other => Err(conflict(identity, other.kind(), MetricKind::Timer)),
        }
    }

    /// Look up without creating.
    pub fn get(&self, identity: &MetricIdentity) -> Option<Metric> {
        self.metrics.get(identity).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// All registered identities with their kinds, sorted by identity.
    pub fn identities(&self) -> Vec<(MetricIdentity, MetricKind)> {
        let mut out: Vec<_> = self
            .metrics
            .iter()
            .map(|r| (r.key().clone(), r.value().kind()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Point-in-time export sorted by identity.
    ///
    /// Each metric is read atomically on its own; there is no cross-metric
    /// consistency. Shard locks are released before any value is read, so
    /// samplers may themselves touch the registry.
    pub fn snapshot(&self) -> Vec<MetricSample> {
        let mut handles: Vec<(MetricIdentity, Metric)> = self
            .metrics
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));

        handles
            .into_iter()
            .map(|(identity, metric)| {
                let kind = metric.kind();
                let value = match metric {
                    Metric::Counter(c) => MetricValue::Counter(c.get()),
                    Metric::Timer(t) => MetricValue::Timer(t.snapshot()),
                    Metric::Gauge(g) => MetricValue::Gauge(read_isolated(&identity, &g)),
                };
                let description = self.description(identity.name());
                MetricSample {
                    identity,
                    kind,
                    value,
                    description,
                }
            })
            .collect()
    }

    fn get_or_insert(
        &self,
        identity: &MetricIdentity,
        requested: MetricKind,
        make: impl FnOnce() -> Metric,
    ) -> Result<Metric> {
        if let Some(existing) = self.metrics.get(identity) {
            return Ok(existing.value().clone());
        }
        let family = *self
            .families
            .entry(identity.name().to_string())
            .or_insert(requested)
            .value();
        if family != requested {
            return Err(conflict(identity, family, requested));
        }
        let entry = self.metrics.entry(identity.clone()).or_insert_with(|| {
            tracing::debug!(metric = %identity, kind = %requested, "metric registered");
            make()
        });
        Ok(entry.value().clone())
    }
}

fn conflict(identity: &MetricIdentity, existing: MetricKind, requested: MetricKind) -> PulseError {
    PulseError::KindConflict {
        identity: identity.to_string(),
        existing,
        requested,
    }
}

/// One broken sampler must not blank the whole snapshot.
fn read_isolated(identity: &MetricIdentity, gauge: &Gauge) -> f64 {
    match catch_unwind(AssertUnwindSafe(|| gauge.read())) {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(metric = %identity, "gauge sampler panicked; reporting NaN");
            f64::NAN
        }
    }
}
