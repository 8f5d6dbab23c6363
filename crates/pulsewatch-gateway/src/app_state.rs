//! Shared application state for the pulsewatch gateway.
//!
//! The registry is constructed once here and handed by reference to every
//! component that records into it; nothing reaches for a global.

use std::sync::Arc;

use pulsewatch_core::error::Result;
use pulsewatch_core::health::{DiskSpaceCheck, MemoryCheck};
use pulsewatch_core::{HealthAggregator, Interceptor, MetricRegistry};

use crate::config::PulseConfig;
use crate::obs::SystemMetrics;
use crate::services::{BusinessMetrics, InMemoryLogStore, LogService};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: PulseConfig,
    registry: Arc<MetricRegistry>,
    interceptor: Interceptor,
    health: HealthAggregator,
    business: BusinessMetrics,
    logs: Arc<LogService>,
}

/// Disk and memory checks configured from `cfg.health`.
pub fn default_health(cfg: &PulseConfig) -> HealthAggregator {
    let h = &cfg.health;
    HealthAggregator::new()
        .with_check(
            "diskSpace",
            Arc::new(DiskSpaceCheck::new(&h.disk_path).min_free_percent(h.disk_min_free_percent)),
        )
        .with_check(
            "memory",
            Arc::new(MemoryCheck::new().max_used_percent(h.memory_max_used_percent)),
        )
}

impl AppState {
    /// Build application state with the built-in health checks.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: PulseConfig) -> Result<Self> {
        let health = default_health(&cfg);
        Self::with_health(cfg, health)
    }

    /// Build application state with a caller-supplied health aggregator.
    pub fn with_health(cfg: PulseConfig, health: HealthAggregator) -> Result<Self> {
        // 1) Registry + interceptor
        let registry = Arc::new(MetricRegistry::new());
        let interceptor = Interceptor::new(Arc::clone(&registry));

        // 2) Startup metrics
        SystemMetrics::register(&registry)?;
        let business = BusinessMetrics::register(&registry)?;

        // 3) Log service + seed data
        let logs = Arc::new(LogService::new(Arc::new(InMemoryLogStore::new())));
        logs.register_metrics(&registry)?;
        logs.seed(cfg.samples.seed_records)?;

        tracing::info!(
            metrics = registry.len(),
            checks = ?health.names(),
            "pulsewatch state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                interceptor,
                health,
                business,
                logs,
            }),
        })
    }

    pub fn cfg(&self) -> &PulseConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.inner.registry
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.inner.interceptor
    }

    pub fn health(&self) -> &HealthAggregator {
        &self.inner.health
    }

    pub fn business(&self) -> &BusinessMetrics {
        &self.inner.business
    }

    pub fn logs(&self) -> &Arc<LogService> {
        &self.inner.logs
    }
}
