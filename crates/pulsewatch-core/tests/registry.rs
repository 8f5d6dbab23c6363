#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pulsewatch_core::{Description, ErrorCode, MetricIdentity, MetricKind, MetricRegistry, MetricValue};

#[test]
fn same_identity_same_instance() {
    let reg = MetricRegistry::new();
    let id = MetricIdentity::new("business.operations").label("type", "login");
    let a = reg.get_or_create_counter(&id).unwrap();
    let b = reg.get_or_create_counter(&id).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(reg.len(), 1);
}

#[test]
fn label_order_resolves_to_one_metric() {
    let reg = MetricRegistry::new();
    let a = reg
        .get_or_create_counter(&MetricIdentity::with_labels("m", [("a", "1"), ("b", "2")]))
        .unwrap();
    let b = reg
        .get_or_create_counter(&MetricIdentity::with_labels("m", [("b", "2"), ("a", "1")]))
        .unwrap();
    a.inc();
    b.inc();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.get(), 2);
}

#[test]
fn racing_creators_get_a_single_instance() {
    let reg = MetricRegistry::new();
    let id = MetricIdentity::new("race").label("k", "v");
    let n = 16;
    let barrier = Barrier::new(n);

    let handles: Vec<_> = thread::scope(|s| {
        let joins: Vec<_> = (0..n)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let c = reg.get_or_create_counter(&id).unwrap();
                    c.inc();
                    c
                })
            })
            .collect();
        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for h in &handles {
        assert!(Arc::ptr_eq(h, &handles[0]));
    }
    assert_eq!(handles[0].get(), n as u64);
    assert_eq!(reg.len(), 1);
}

#[test]
fn kind_conflict_is_rejected() {
    let reg = MetricRegistry::new();
    let id = MetricIdentity::new("shared");
    reg.get_or_create_counter(&id).unwrap();

    let err = reg.get_or_create_gauge(&id, None).expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::KindConflict);
    let err = reg.get_or_create_timer(&id).expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::KindConflict);

    // The original counter is untouched.
    assert_eq!(reg.identities(), vec![(id, MetricKind::Counter)]);
}

#[test]
fn one_name_carries_one_kind_across_label_sets() {
    let reg = MetricRegistry::new();
    reg.get_or_create_counter(&MetricIdentity::new("x").label("a", "1"))
        .unwrap();

    let err = reg
        .get_or_create_gauge(&MetricIdentity::new("x").label("a", "2"), None)
        .expect_err("gauge under a counter name");
    assert_eq!(err.code(), ErrorCode::KindConflict);
    assert!(reg
        .get_or_create_timer(&MetricIdentity::new("x"))
        .is_err());

    // Same kind under a new label set is fine.
    reg.get_or_create_counter(&MetricIdentity::new("x").label("a", "3"))
        .unwrap();
    assert_eq!(reg.len(), 2);
}

#[test]
fn first_description_wins_and_reaches_the_snapshot() {
    let reg = MetricRegistry::new();
    let kept = reg.describe("mem.used", Description::new("used memory").base_unit("bytes"));
    let again = reg.describe("mem.used", Description::new("ignored"));
    assert_eq!(again, kept);

    reg.get_or_create_gauge(&MetricIdentity::new("mem.used"), None)
        .unwrap();
    reg.get_or_create_counter(&MetricIdentity::new("plain")).unwrap();

    let snap = reg.snapshot();
    let desc = snap[0].description.as_ref().expect("described");
    assert_eq!(desc.help, "used memory");
    assert_eq!(desc.base_unit.as_deref(), Some("bytes"));
    assert!(snap[1].description.is_none());
}

#[test]
fn first_gauge_registration_wins() {
    let reg = MetricRegistry::new();
    let id = MetricIdentity::new("g");
    let g = reg.get_or_create_gauge(&id, Some(Arc::new(|| 7.0))).unwrap();
    let again = reg.get_or_create_gauge(&id, None).unwrap();
    assert!(Arc::ptr_eq(&g, &again));
    assert_eq!(again.read(), 7.0);
    assert!(again.set(1.0).is_err());
}

#[test]
fn snapshot_is_sorted_and_typed() {
    let reg = MetricRegistry::new();
    reg.get_or_create_timer(&MetricIdentity::new("c.timer"))
        .unwrap()
        .record(Duration::from_millis(1));
    reg.get_or_create_counter(&MetricIdentity::new("a.counter"))
        .unwrap()
        .increment(3);
    reg.get_or_create_gauge(&MetricIdentity::new("b.gauge"), None)
        .unwrap()
        .set(1.5)
        .unwrap();

    let snap = reg.snapshot();
    let names: Vec<_> = snap.iter().map(|s| s.identity.name()).collect();
    assert_eq!(names, ["a.counter", "b.gauge", "c.timer"]);
    assert_eq!(snap[0].kind, MetricKind::Counter);
    assert_eq!(snap[0].value, MetricValue::Counter(3));
    assert_eq!(snap[1].value, MetricValue::Gauge(1.5));
    match &snap[2].value {
        MetricValue::Timer(t) => assert_eq!(t.count, 1),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn panicking_sampler_does_not_blank_snapshot() {
    let reg = MetricRegistry::new();
    reg.get_or_create_gauge(
        &MetricIdentity::new("broken"),
        Some(Arc::new(|| -> f64 { panic!("sampler exploded") })),
    )
    .unwrap();
    reg.get_or_create_counter(&MetricIdentity::new("healthy")).unwrap().inc();

    let snap = reg.snapshot();
    assert_eq!(snap.len(), 2);
    match snap[0].value {
        MetricValue::Gauge(v) => assert!(v.is_nan()),
        ref other => panic!("unexpected {other:?}"),
    }
    assert_eq!(snap[1].value, MetricValue::Counter(1));
}

#[test]
fn sampler_may_touch_the_registry() {
    let reg = Arc::new(MetricRegistry::new());
    let inner = Arc::clone(&reg);
    reg.get_or_create_gauge(
        &MetricIdentity::new("metric.count"),
        Some(Arc::new(move || inner.len() as f64)),
    )
    .unwrap();
    reg.get_or_create_counter(&MetricIdentity::new("other")).unwrap();

    let snap = reg.snapshot();
    assert_eq!(snap[0].value, MetricValue::Gauge(2.0));
}
