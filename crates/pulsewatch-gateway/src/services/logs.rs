//! Demo log records and their persistence collaborator.
//!
//! The store is an interface; `InMemoryLogStore` is the bundled implementation.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use pulsewatch_core::{Description, MetricIdentity, MetricRegistry, Result};

use crate::scheduler::SampleEventCallback;

/// Actions cycled through by generated records.
pub const ACTIONS: [&str; 6] = ["LOGIN", "LOGOUT", "CREATE", "UPDATE", "DELETE", "VIEW"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Assigned by the store on save.
    pub id: Option<u64>,
    pub action: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            action: action.into(),
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Persistence collaborator.
pub trait LogStore: Send + Sync {
    /// Persist and return the record with its id.
    fn save(&self, record: LogRecord) -> Result<LogRecord>;
    /// Every record, oldest first.
    fn find_all(&self) -> Result<Vec<LogRecord>>;
    fn count(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryLogStore {
    records: DashMap<u64, LogRecord>,
    next_id: AtomicU64,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl LogStore for InMemoryLogStore {
    fn save(&self, mut record: LogRecord) -> Result<LogRecord> {
        let id = match record.id {
            Some(id) => id,
            None => self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        record.id = Some(id);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn find_all(&self) -> Result<Vec<LogRecord>> {
        let mut all: Vec<LogRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }

    fn count(&self) -> usize {
        self.records.len()
    }
}

pub struct LogService {
    store: Arc<dyn LogStore>,
    cursor: AtomicUsize,
}

impl LogService {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Expose the store size as the `logstore.records` gauge.
    pub fn register_metrics(&self, registry: &MetricRegistry) -> Result<()> {
        let store = Arc::clone(&self.store);
        registry.describe("logstore.records", Description::new("Log records held by the store"));
        registry.get_or_create_gauge(
            &MetricIdentity::new("logstore.records"),
            Some(Arc::new(move || store.count() as f64)),
        )?;
        Ok(())
    }

    pub fn create_log(&self, action: &str, description: &str) -> Result<LogRecord> {
        self.store.save(LogRecord::new(action, description))
    }

    /// Next action in rotation with a generated description.
    pub fn create_random_log(&self) -> Result<LogRecord> {
        let n = self.cursor.fetch_add(1, Ordering::Relaxed);
        let action = ACTIONS[n % ACTIONS.len()];
        let description = format!("auto-generated log record #{}", Utc::now().timestamp_millis());
        self.create_log(action, &description)
    }

    pub fn all_logs(&self) -> Result<Vec<LogRecord>> {
        self.store.find_all()
    }

    pub fn seed(&self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.create_random_log()?;
        }
        Ok(())
    }

    /// Scheduled callback: one generated record per tick.
    pub fn generate_sample_event(&self) {
        match self.create_random_log() {
            Ok(rec) => tracing::info!(id = ?rec.id, action = %rec.action, "sample log generated"),
            Err(e) => tracing::warn!(error = %e, "sample log generation failed"),
        }
    }

    pub fn sample_event_callback(self: &Arc<Self>) -> SampleEventCallback {
        let this = Arc::clone(self);
        Arc::new(move || this.generate_sample_event())
    }
}
