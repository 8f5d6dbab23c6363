//! Metric identity: name plus an order-independent label set.
//!
//! Labels are kept as a sorted `(key, value)` vector so that derived
//! `Eq`/`Hash`/`Ord` already treat two identities built in different call order
//! as the same key.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MetricIdentity {
    name: String,
    labels: Vec<(String, String)>,
}

impl MetricIdentity {
    /// Identity with no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Build from arbitrary-order label pairs.
    pub fn with_labels<K, V>(name: impl Into<String>, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut key: Vec<(String, String)> = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        key.sort();
        Self {
            name: name.into(),
            labels: key,
        }
    }

    /// Add one label, keeping the set sorted.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (key.into(), value.into());
        let at = self.labels.partition_point(|p| p <= &pair);
        self.labels.insert(at, pair);
        self
    }

    /// Set `key` to `value`, dropping any pairs already under `key`.
    pub fn replace_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.labels.retain(|(k, _)| *k != key);
        self.label(key, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Labels in canonical (sorted) order.
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    /// Same labels under a different metric name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: self.labels.clone(),
        }
    }
}

impl fmt::Display for MetricIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.labels.is_empty() {
            return Ok(());
        }
        f.write_str("{")?;
        for (i, (k, v)) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}
