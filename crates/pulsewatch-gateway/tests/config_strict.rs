#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pulsewatch_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
health:
  disk_min_free_pct: 5 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.health.disk_path, "/");
    assert_eq!(cfg.health.disk_min_free_percent, 10.0);
    assert_eq!(cfg.health.memory_max_used_percent, 90.0);
    assert_eq!(cfg.samples.interval_ms, 60000);
    assert_eq!(cfg.samples.seed_records, 10);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
gateway:
  listen: "127.0.0.1:9100"
health:
  disk_path: "/var"
  disk_min_free_percent: 15.5
  memory_max_used_percent: 80
samples:
  interval_ms: 5000
  seed_records: 0
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.gateway.listen, "127.0.0.1:9100");
    assert_eq!(cfg.health.disk_path, "/var");
    assert_eq!(cfg.health.disk_min_free_percent, 15.5);
    assert_eq!(cfg.health.memory_max_used_percent, 80.0);
    assert_eq!(cfg.samples.interval_ms, 5000);
    assert_eq!(cfg.samples.seed_records, 0);
}

#[test]
fn wrong_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_rejected() {
    for bad in [
        "version: 1\nhealth:\n  disk_min_free_percent: 120\n",
        "version: 1\nhealth:\n  memory_max_used_percent: -1\n",
        "version: 1\nsamples:\n  interval_ms: 10\n",
        "version: 1\nsamples:\n  seed_records: 5000\n",
        "version: 1\nhealth:\n  disk_path: \"\"\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "BAD_REQUEST", "{bad}");
    }
}
