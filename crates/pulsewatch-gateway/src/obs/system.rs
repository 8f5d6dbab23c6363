//! Process and host sampler gauges.
//!
//! Every gauge polls its source on scrape; a source that cannot be read
//! reports NaN instead of failing the scrape.

use std::sync::Arc;
use std::time::Instant;

use pulsewatch_core::{Description, MetricIdentity, MetricRegistry, Result, Sampler};

pub struct SystemMetrics;

impl SystemMetrics {
    /// Register `system.*` and `process.*` gauges on `registry`.
    pub fn register(registry: &MetricRegistry) -> Result<()> {
        let started = Instant::now();
        let gauges: [(&str, Description, Sampler); 5] = [
            (
                "system.cpu.count",
                Description::new("Number of available processors"),
                Arc::new(cpu_count),
            ),
            (
                "system.cpu.load",
                Description::new("One-minute system load average"),
                Arc::new(|| read_load_average().unwrap_or(f64::NAN)),
            ),
            (
                "process.memory.resident",
                Description::new("Resident memory of this process").base_unit("bytes"),
                Arc::new(|| read_status_field("VmRSS:").map_or(f64::NAN, |kb| kb.saturating_mul(1024) as f64)),
            ),
            (
                "process.threads",
                Description::new("Live threads in this process"),
                Arc::new(|| read_status_field("Threads:").map_or(f64::NAN, |n| n as f64)),
            ),
            (
                "process.uptime",
                Description::new("Time since the metrics were registered").base_unit("seconds"),
                Arc::new(move || started.elapsed().as_secs_f64()),
            ),
        ];
        for (name, description, sampler) in gauges {
            registry.describe(name, description);
            registry.get_or_create_gauge(&MetricIdentity::new(name), Some(sampler))?;
        }
        Ok(())
    }
}

fn cpu_count() -> f64 {
    std::thread::available_parallelism().map_or(f64::NAN, |n| n.get() as f64)
}

#[cfg(target_os = "linux")]
fn read_load_average() -> Option<f64> {
    let raw = std::fs::read_to_string("/proc/loadavg").ok()?;
    raw.split_whitespace().next()?.parse().ok()
}

#[cfg(not(target_os = "linux"))]
fn read_load_average() -> Option<f64> {
    None
}

/// First numeric column of a `/proc/self/status` line.
#[cfg(target_os = "linux")]
fn read_status_field(prefix: &str) -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix(prefix) {
            return rest.split_whitespace().next()?.parse().ok();
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn read_status_field(_prefix: &str) -> Option<u64> {
    None
}
