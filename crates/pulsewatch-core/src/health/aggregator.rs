use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::join_all;
use futures_util::FutureExt;
use serde::Serialize;

use super::{Health, HealthCheck, Status};

/// Composite verdict: `UP` iff every component is `UP`.
///
/// `components` is keyed by check name in sorted order, independent of
/// registration order, so repeated scrapes render identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeHealth {
    pub status: Status,
    pub components: BTreeMap<String, Health>,
}

impl CompositeHealth {
    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }
}

/// Named, ordered set of checks.
#[derive(Default, Clone)]
pub struct HealthAggregator {
    checks: Vec<(String, Arc<dyn HealthCheck>)>,
}

impl HealthAggregator {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a check. Re-registering a name replaces the old check in place.
    pub fn register(&mut self, name: impl Into<String>, check: Arc<dyn HealthCheck>) {
        let name = name.into();
        match self.checks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = check,
            None => self.checks.push((name, check)),
        }
    }

    pub fn with_check(mut self, name: impl Into<String>, check: Arc<dyn HealthCheck>) -> Self {
        self.register(name, check);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Run every check concurrently and fold the results.
    ///
    /// Never fails: a check returning an error or panicking is reported as
    /// `DOWN` with an `error` detail.
    pub async fn check(&self) -> CompositeHealth {
        let results = join_all(
            self.checks
                .iter()
                .map(|(name, check)| async move { (name.clone(), evaluate(name, check.as_ref()).await) }),
        )
        .await;

        let status = if results.iter().all(|(_, h)| h.is_up()) {
            Status::Up
        } else {
            Status::Down
        };

        CompositeHealth {
            status,
            components: results.into_iter().collect(),
        }
    }
}

async fn evaluate(name: &str, check: &dyn HealthCheck) -> Health {
    match AssertUnwindSafe(check.check()).catch_unwind().await {
        Ok(Ok(h)) => {
            if !h.is_up() {
                tracing::warn!(check = %name, "component reports DOWN");
            }
            h
        }
        Ok(Err(e)) => {
            tracing::warn!(check = %name, error = %e, "health check failed");
            Health::down().with_detail("error", e.to_string())
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::warn!(check = %name, error = %msg, "health check panicked");
            Health::down().with_detail("error", msg)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "health check panicked".to_string()
    }
}
