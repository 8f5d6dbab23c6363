use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::error::{PulseError, Result};

/// Fixed cumulative bucket bounds in microseconds:
/// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
pub const BUCKETS_MICROS: [u64; 9] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000,
];

#[derive(Debug, Default, Clone, Copy)]
struct TimerState {
    count: u64,
    sum_nanos: u64,
    max_nanos: u64,
    buckets: [u64; BUCKETS_MICROS.len()],
}

/// Point-in-time copy of a timer. All fields describe the same set of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub count: u64,
    pub sum_nanos: u64,
    pub max_nanos: u64,
    pub mean_nanos: f64,
    /// `(le_micros, cumulative_count)` pairs, `+Inf` excluded (equals `count`).
    pub buckets: Vec<(u64, u64)>,
}

/// Count + duration distribution accumulator.
///
/// count/sum/max/buckets advance together under one short critical section so
/// a concurrent reader never sees a count without its matching sum.
#[derive(Debug, Default)]
pub struct Timer {
    state: Mutex<TimerState>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation.
    pub fn record(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.record_nanos(nanos);
    }

    /// Record a signed nanosecond duration, rejecting negatives.
    pub fn try_record_nanos(&self, nanos: i64) -> Result<()> {
        let nanos = u64::try_from(nanos).map_err(|_| PulseError::InvalidDuration(nanos))?;
        self.record_nanos(nanos);
        Ok(())
    }

    fn record_nanos(&self, nanos: u64) {
        // Nothing in the critical section can panic; a poisoned lock still holds valid data.
        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        st.count += 1;
        st.sum_nanos = st.sum_nanos.saturating_add(nanos);
        st.max_nanos = st.max_nanos.max(nanos);
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if nanos <= b.saturating_mul(1_000) {
                st.buckets[i] += 1;
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let st = *self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mean_nanos = if st.count == 0 {
            0.0
        } else {
            st.sum_nanos as f64 / st.count as f64
        };
        TimerSnapshot {
            count: st.count,
            sum_nanos: st.sum_nanos,
            max_nanos: st.max_nanos,
            mean_nanos,
            buckets: BUCKETS_MICROS.iter().copied().zip(st.buckets).collect(),
        }
    }
}
