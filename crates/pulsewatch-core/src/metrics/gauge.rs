use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{PulseError, Result};

/// Zero-argument value source polled on every read.
///
/// Runs on the scrape path: it must be callable concurrently and return promptly.
pub type Sampler = Arc<dyn Fn() -> f64 + Send + Sync>;

enum Source {
    /// f64 bit pattern.
    Cell(AtomicU64),
    Sampled(Sampler),
}

/// Instantaneous value: either a settable cell or a sampler.
pub struct Gauge {
    name: String,
    source: Source,
}

impl Gauge {
    /// Settable cell starting at 0.
    pub fn cell(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: Source::Cell(AtomicU64::new(0f64.to_bits())),
        }
    }

    /// Read-only gauge backed by `sampler`.
    pub fn sampled(name: impl Into<String>, sampler: Sampler) -> Self {
        Self {
            name: name.into(),
            source: Source::Sampled(sampler),
        }
    }

    pub fn is_sampled(&self) -> bool {
        matches!(self.source, Source::Sampled(_))
    }

    /// Current value. Sampler-backed gauges call the sampler synchronously, uncached.
    pub fn read(&self) -> f64 {
        match &self.source {
            Source::Cell(bits) => f64::from_bits(bits.load(Ordering::Relaxed)),
            Source::Sampled(sampler) => sampler(),
        }
    }

    /// Last writer wins.
    pub fn set(&self, value: f64) -> Result<()> {
        self.cell_bits()?.store(value.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Add a signed delta (CAS loop on the bit pattern).
    pub fn add(&self, delta: f64) -> Result<()> {
        let bits = self.cell_bits()?;
        let mut cur = bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match bits.compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Ok(()),
                Err(actual) => cur = actual,
            }
        }
    }

    pub fn inc(&self) -> Result<()> {
        self.add(1.0)
    }

    pub fn dec(&self) -> Result<()> {
        self.add(-1.0)
    }

    fn cell_bits(&self) -> Result<&AtomicU64> {
        match &self.source {
            Source::Cell(bits) => Ok(bits),
            Source::Sampled(_) => Err(PulseError::ReadOnlyGauge(self.name.clone())),
        }
    }
}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge")
            .field("name", &self.name)
            .field("sampled", &self.is_sampled())
            .finish()
    }
}
