//! Prometheus text exposition (format 0.0.4) of a registry snapshot.
//!
//! Dotted metric names are sanitised (`api.calls` -> `api_calls`), counters get
//! a `_total` suffix, and timers render as histograms in seconds plus a `_max`
//! gauge. A description becomes `# HELP`, and its base unit is appended to
//! counter and gauge names (`process_memory_resident_bytes`). Samples arrive
//! sorted by identity, so one metric family is always a contiguous run.

use std::fmt::Write;

use pulsewatch_core::{MetricKind, MetricSample, MetricValue, TimerSnapshot};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Map an arbitrary metric or label name onto `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn label_str(labels: &[(String, String)]) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", sanitize_name(k), escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braces(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{labels}}}")
    }
}

fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        format!("{v}")
    }
}

fn nanos_to_secs(n: u64) -> f64 {
    n as f64 / 1e9
}

/// Render every sample.
pub fn render(samples: &[MetricSample]) -> String {
    let mut out = String::new();
    let mut start = 0;
    while start < samples.len() {
        let (name, kind) = (samples[start].identity.name(), samples[start].kind);
        let end = samples[start..]
            .iter()
            .position(|s| s.identity.name() != name || s.kind != kind)
            .map_or(samples.len(), |p| start + p);
        render_family(&samples[start..end], &mut out);
        start = end;
    }
    out
}

fn render_family(family: &[MetricSample], out: &mut String) {
    let Some(first) = family.first() else { return };
    let mut base = sanitize_name(first.identity.name());
    let help = first.description.as_ref().map(|d| escape_help(&d.help));

    if first.kind != MetricKind::Timer {
        if let Some(unit) = first.description.as_ref().and_then(|d| d.base_unit.as_deref()) {
            let unit = sanitize_name(unit);
            if !base.ends_with(&format!("_{unit}")) {
                base = format!("{base}_{unit}");
            }
        }
    }

    let type_name = match first.kind {
        MetricKind::Counter => format!("{base}_total"),
        MetricKind::Gauge => base.clone(),
        MetricKind::Timer => format!("{base}_seconds"),
    };
    if let Some(help) = &help {
        let _ = writeln!(out, "# HELP {type_name} {help}");
    }
    let kind = match first.kind {
        MetricKind::Counter => "counter",
        MetricKind::Gauge => "gauge",
        MetricKind::Timer => "histogram",
    };
    let _ = writeln!(out, "# TYPE {type_name} {kind}");

    let mut max_lines = String::new();
    for s in family {
        let labels = label_str(s.identity.labels());
        match &s.value {
            MetricValue::Counter(v) => {
                let _ = writeln!(out, "{base}_total{} {v}", braces(&labels));
            }
            MetricValue::Gauge(v) => {
                let _ = writeln!(out, "{base}{} {}", braces(&labels), fmt_float(*v));
            }
            MetricValue::Timer(t) => {
                render_histogram(&base, &labels, t, out);
                let _ = writeln!(
                    max_lines,
                    "{base}_seconds_max{} {}",
                    braces(&labels),
                    fmt_float(nanos_to_secs(t.max_nanos))
                );
            }
        }
    }

    if !max_lines.is_empty() {
        if let Some(help) = &help {
            let _ = writeln!(out, "# HELP {base}_seconds_max {help} (max)");
        }
        let _ = writeln!(out, "# TYPE {base}_seconds_max gauge");
        out.push_str(&max_lines);
    }
}

fn render_histogram(base: &str, labels: &str, t: &TimerSnapshot, out: &mut String) {
    let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };
    for &(le_micros, count) in &t.buckets {
        let le = fmt_float(le_micros as f64 / 1e6);
        let _ = writeln!(out, "{base}_seconds_bucket{{{prefix}le=\"{le}\"}} {count}");
    }
    let _ = writeln!(out, "{base}_seconds_bucket{{{prefix}le=\"+Inf\"}} {}", t.count);
    let _ = writeln!(
        out,
        "{base}_seconds_sum{} {}",
        braces(labels),
        fmt_float(nanos_to_secs(t.sum_nanos))
    );
    let _ = writeln!(out, "{base}_seconds_count{} {}", braces(labels), t.count);
}
