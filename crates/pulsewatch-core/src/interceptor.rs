//! Call-count / latency / error observation around arbitrary operations.
//!
//! The wrapped operation never learns it is observed: its `Ok`/`Err` value is
//! returned untouched and panics are resumed with the original payload after
//! the metrics are recorded.

use std::borrow::Cow;
use std::future::Future;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;

use crate::error::PulseError;
use crate::identity::MetricIdentity;
use crate::metrics::Timer;
use crate::registry::{Description, MetricRegistry};

/// Label key carrying the operation's logical name.
pub const OPERATION_LABEL: &str = "api";
/// Label key carrying the failure kind on the error counter.
pub const FAILURE_LABEL: &str = "exception";
/// Failure kind recorded when the operation panics.
pub const PANIC_KIND: &str = "panic";

/// Names a failure for the error counter's label.
pub trait FailureKind {
    fn failure_kind(&self) -> Cow<'static, str>;
}

impl FailureKind for PulseError {
    fn failure_kind(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.code().as_str())
    }
}

impl FailureKind for std::io::Error {
    fn failure_kind(&self) -> Cow<'static, str> {
        Cow::Owned(format!("{:?}", self.kind()))
    }
}

/// Logical identity of an instrumented operation (label set, no metric name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    labels: MetricIdentity,
}

impl OperationId {
    /// `{api=<name>}`, e.g. `DemoController.hello` or a route.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            labels: MetricIdentity::new("").label(OPERATION_LABEL, name),
        }
    }

    /// Add or overwrite a label. `exception` is reserved for the error
    /// counter and is ignored here.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key == FAILURE_LABEL {
            tracing::warn!(label = FAILURE_LABEL, "reserved operation label ignored");
            return self;
        }
        self.labels = self.labels.replace_label(key, value);
        self
    }

    /// This operation's labels under metric `name`.
    pub fn metric(&self, name: &str) -> MetricIdentity {
        self.labels.renamed(name)
    }
}

/// Metric names the interceptor records under.
#[derive(Debug, Clone)]
pub struct InterceptorNames {
    pub calls: String,
    pub duration: String,
    pub errors: String,
}

impl Default for InterceptorNames {
    fn default() -> Self {
        Self {
            calls: "api.calls".into(),
            duration: "api.response.time".into(),
            errors: "api.errors".into(),
        }
    }
}

/// Wraps operations and records `calls`, `duration` and `errors{exception}`.
#[derive(Clone)]
pub struct Interceptor {
    registry: Arc<MetricRegistry>,
    names: Arc<InterceptorNames>,
}

/// Timer resolved at call start plus the start instant.
struct Probe {
    timer: Option<Arc<Timer>>,
    started: Instant,
}

enum Outcome {
    Ok,
    Failed(Cow<'static, str>),
}

impl Interceptor {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        Self::with_names(registry, InterceptorNames::default())
    }

    pub fn with_names(registry: Arc<MetricRegistry>, names: InterceptorNames) -> Self {
        registry.describe(&names.calls, Description::new("API call count"));
        registry.describe(
            &names.duration,
            Description::new("API response time").base_unit("seconds"),
        );
        registry.describe(&names.errors, Description::new("API error count"));
        Self {
            registry,
            names: Arc::new(names),
        }
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn names(&self) -> &InterceptorNames {
        &self.names
    }

    /// Run `op`, classifying failures through [`FailureKind`].
    pub fn intercept<T, E, F>(&self, id: &OperationId, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: FailureKind,
    {
        self.intercept_with(id, op, E::failure_kind)
    }

    /// Run `op`, classifying failures with `classify`.
    pub fn intercept_with<T, E, F, C, K>(&self, id: &OperationId, op: F, classify: C) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        C: FnOnce(&E) -> K,
        K: Into<Cow<'static, str>>,
    {
        let probe = self.begin(id);
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(v)) => {
                self.finish(id, probe, Outcome::Ok);
                Ok(v)
            }
            Ok(Err(e)) => {
                self.finish(id, probe, Outcome::Failed(classify(&e).into()));
                Err(e)
            }
            Err(payload) => {
                self.finish(id, probe, Outcome::Failed(Cow::Borrowed(PANIC_KIND)));
                resume_unwind(payload)
            }
        }
    }

    /// Async counterpart of [`Interceptor::intercept`]; the timer covers the
    /// whole `.await`.
    pub async fn intercept_async<T, E, Fut>(&self, id: &OperationId, op: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: FailureKind,
    {
        let probe = self.begin(id);
        match AssertUnwindSafe(op).catch_unwind().await {
            Ok(Ok(v)) => {
                self.finish(id, probe, Outcome::Ok);
                Ok(v)
            }
            Ok(Err(e)) => {
                self.finish(id, probe, Outcome::Failed(e.failure_kind()));
                Err(e)
            }
            Err(payload) => {
                self.finish(id, probe, Outcome::Failed(Cow::Borrowed(PANIC_KIND)));
                resume_unwind(payload)
            }
        }
    }

    /// Turn `op` into a callable that is observed on every invocation.
    pub fn wrap<T, E, F>(&self, id: OperationId, op: F) -> impl Fn() -> Result<T, E>
    where
        F: Fn() -> Result<T, E>,
        E: FailureKind,
    {
        let this = self.clone();
        move || this.intercept(&id, &op)
    }

    fn begin(&self, id: &OperationId) -> Probe {
        let calls = observe(self.registry.get_or_create_counter(&id.metric(&self.names.calls)));
        let timer = observe(self.registry.get_or_create_timer(&id.metric(&self.names.duration)));
        // Counted before running: a call that later fails still counts.
        if let Some(c) = calls {
            c.inc();
        }
        Probe {
            timer,
            started: Instant::now(),
        }
    }

    fn finish(&self, id: &OperationId, probe: Probe, outcome: Outcome) {
        let elapsed = probe.started.elapsed();
        if let Outcome::Failed(kind) = outcome {
            let ident = id.metric(&self.names.errors).replace_label(FAILURE_LABEL, kind);
            if let Some(errors) = observe(self.registry.get_or_create_counter(&ident)) {
                errors.inc();
            }
        }
        if let Some(t) = &probe.timer {
            t.record(elapsed);
        }
    }
}

/// Metric conflicts leave the operation unobserved, never failed.
fn observe<M>(res: crate::Result<Arc<M>>) -> Option<Arc<M>> {
    match res {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = %e, "interceptor metric unavailable");
            None
        }
    }
}
