#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pulsewatch_core::MetricIdentity;

fn hash_of(id: &MetricIdentity) -> u64 {
    let mut h = DefaultHasher::new();
    id.hash(&mut h);
    h.finish()
}

#[test]
fn label_order_does_not_matter() {
    let a = MetricIdentity::with_labels("api.calls", [("api", "x"), ("method", "GET")]);
    let b = MetricIdentity::new("api.calls").label("method", "GET").label("api", "x");
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn name_and_values_both_participate() {
    let a = MetricIdentity::new("api.calls").label("api", "x");
    assert_ne!(a, MetricIdentity::new("api.errors").label("api", "x"));
    assert_ne!(a, MetricIdentity::new("api.calls").label("api", "y"));
    assert_ne!(a, MetricIdentity::new("api.calls"));
}

#[test]
fn duplicate_pairs_are_a_multiset() {
    let a = MetricIdentity::with_labels("m", [("k", "1"), ("k", "1")]);
    let b = MetricIdentity::with_labels("m", [("k", "1")]);
    assert_ne!(a, b);
    assert_eq!(a, MetricIdentity::new("m").label("k", "1").label("k", "1"));
}

#[test]
fn display_is_canonical() {
    let id = MetricIdentity::new("api.errors").label("exception", "Io").label("api", "a");
    assert_eq!(id.to_string(), "api.errors{api=a,exception=Io}");
    assert_eq!(MetricIdentity::new("bare").to_string(), "bare");
}

#[test]
fn renamed_keeps_labels() {
    let id = MetricIdentity::new("api.calls").label("api", "a");
    let t = id.renamed("api.response.time");
    assert_eq!(t.name(), "api.response.time");
    assert_eq!(t.labels(), id.labels());
}
