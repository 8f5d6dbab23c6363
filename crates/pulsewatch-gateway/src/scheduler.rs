//! Periodic trigger for the sample-event callback.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

/// Zero-argument callback invoked once per tick.
pub type SampleEventCallback = Arc<dyn Fn() + Send + Sync>;

/// Spawn a task calling `callback` every `every`, starting one interval from
/// now. Abort the returned handle to stop it.
pub fn spawn_sample_generator(every: Duration, callback: SampleEventCallback) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        tick.tick().await;
        loop {
            tick.tick().await;
            callback();
        }
    })
}
