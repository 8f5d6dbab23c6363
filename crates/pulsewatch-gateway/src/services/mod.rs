//! Business-side collaborators calling into the registry.
//!
//! - `business`: pass-through business counters/gauges
//! - `logs`: demo log records, their store, and the sample-event callback

pub mod business;
pub mod logs;

pub use business::BusinessMetrics;
pub use logs::{InMemoryLogStore, LogRecord, LogService, LogStore, ACTIONS};
