//! Observability glue around the core registry.
//!
//! - `prometheus`: text exposition of a registry snapshot
//! - `system`: process/host sampler gauges registered at startup

pub mod prometheus;
pub mod system;

pub use prometheus::render;
pub use system::SystemMetrics;
