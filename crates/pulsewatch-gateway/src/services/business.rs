use std::sync::Arc;

use pulsewatch_core::{Counter, Description, Gauge, MetricIdentity, MetricRegistry, Result};

const OPERATIONS: &str = "business.operations";

/// Business gauges and the `business.operations{type}` counter family.
#[derive(Clone)]
pub struct BusinessMetrics {
    active_users: Arc<Gauge>,
    pending_tasks: Arc<Gauge>,
    system_status: Arc<Gauge>,
    logins: Arc<Counter>,
    logouts: Arc<Counter>,
    transactions: Arc<Counter>,
}

impl BusinessMetrics {
    /// Pre-create every business metric so it is scraped from the start.
    pub fn register(registry: &MetricRegistry) -> Result<Self> {
        registry.describe("business.users.active", Description::new("Currently active users"));
        registry.describe("business.tasks.pending", Description::new("Tasks waiting to be processed"));
        registry.describe(
            "business.system.status",
            Description::new("System status: 1 = normal, 0 = abnormal"),
        );
        registry.describe(OPERATIONS, Description::new("Business operations by type"));

        let gauge = |name: &str| registry.get_or_create_gauge(&MetricIdentity::new(name), None);
        let op = |ty: &str| registry.get_or_create_counter(&MetricIdentity::new(OPERATIONS).label("type", ty));

        let metrics = Self {
            active_users: gauge("business.users.active")?,
            pending_tasks: gauge("business.tasks.pending")?,
            system_status: gauge("business.system.status")?,
            logins: op("login")?,
            logouts: op("logout")?,
            transactions: op("transaction")?,
        };
        metrics.set_system_status(true)?;
        Ok(metrics)
    }

    pub fn set_active_users(&self, count: u64) -> Result<()> {
        self.active_users.set(count as f64)
    }
    pub fn increment_active_users(&self) -> Result<()> {
        self.active_users.inc()
    }
    pub fn decrement_active_users(&self) -> Result<()> {
        self.active_users.dec()
    }

    pub fn set_pending_tasks(&self, count: u64) -> Result<()> {
        self.pending_tasks.set(count as f64)
    }
    pub fn increment_pending_tasks(&self) -> Result<()> {
        self.pending_tasks.inc()
    }
    pub fn decrement_pending_tasks(&self) -> Result<()> {
        self.pending_tasks.dec()
    }

    /// 1 = normal, 0 = abnormal.
    pub fn set_system_status(&self, normal: bool) -> Result<()> {
        self.system_status.set(if normal { 1.0 } else { 0.0 })
    }

    pub fn record_login(&self) {
        self.logins.inc();
    }
    pub fn record_logout(&self) {
        self.logouts.inc();
    }
    pub fn record_transaction(&self) {
        self.transactions.inc();
    }

    pub fn active_users(&self) -> f64 {
        self.active_users.read()
    }
}
