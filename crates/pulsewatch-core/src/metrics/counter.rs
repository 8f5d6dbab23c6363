use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PulseError, Result};

/// Monotonic cumulative count.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.increment(1);
    }

    /// Increment by an arbitrary non-negative value.
    pub fn increment(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Increment by a signed delta, rejecting negatives.
    pub fn try_increment(&self, delta: i64) -> Result<()> {
        let delta = u64::try_from(delta).map_err(|_| PulseError::InvalidDelta(delta))?;
        self.increment(delta);
        Ok(())
    }

    /// Current accumulated total.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}
