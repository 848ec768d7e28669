use super::json_number;
use crate::metrics_aggregation::domain::{FieldKind, FieldValue, MetricDomain, MetricFragment};
use serde_json::{Map, Value};
use std::path::Path;

/// Accepted JSON keys per schema field, canonical name first.
const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("total", &["total", "tests_total", "total_tests"]),
    ("passed", &["passed", "tests_passed", "passes"]),
    ("failed", &["failed", "tests_failed", "failures"]),
    ("skipped", &["skipped", "tests_skipped"]),
    ("coverage", &["coverage", "coverage_percentage"]),
    ("duration_seconds", &["duration_seconds", "duration"]),
    (
        "avg_response_time_ms",
        &["avg_response_time_ms", "avg_response_time", "average_response_time"],
    ),
    ("p95_response_time_ms", &["p95_response_time_ms", "p95_response_time", "p95"]),
    ("p99_response_time_ms", &["p99_response_time_ms", "p99_response_time", "p99"]),
    ("error_rate", &["error_rate"]),
    ("throughput_rps", &["throughput_rps", "throughput", "requests_per_second"]),
];

/// Fields only a performance run reports. Flat shapes are attributed to
/// the performance domain only when one of these is present, and to the
/// unit-test domain only when none is.
const PERFORMANCE_SIGNATURE: &[&str] = &[
    "avg_response_time_ms",
    "p95_response_time_ms",
    "p99_response_time_ms",
    "error_rate",
    "throughput_rps",
];

/// Where a domain's counters may sit in a test-results document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `{"unit_tests": {...}}`
    Keyed,
    /// `{"tests": {"unit_tests": {...}}}`
    NestedUnderTests,
    /// `{"tests": {...}}`
    FlatUnderTests,
    /// `{...}` with counters at the top level
    FlatTopLevel,
}

const SHAPES: [Shape; 4] = [
    Shape::Keyed,
    Shape::NestedUnderTests,
    Shape::FlatUnderTests,
    Shape::FlatTopLevel,
];

impl Shape {
    fn locate<'a>(
        &self,
        root: &'a Map<String, Value>,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        match self {
            Shape::Keyed => root.get(key)?.as_object(),
            Shape::NestedUnderTests => root.get("tests")?.as_object()?.get(key)?.as_object(),
            Shape::FlatUnderTests => root.get("tests")?.as_object(),
            Shape::FlatTopLevel => Some(root),
        }
    }

    fn is_flat(&self) -> bool {
        matches!(self, Shape::FlatUnderTests | Shape::FlatTopLevel)
    }
}

/// Parses unit-test or performance-test results JSON.
///
/// Shapes are tried in order and the first one holding any recognised
/// counter wins. A counter whose value cannot be read as a number is
/// reported as zero instead of failing the parse. A missing `total` is
/// derived from passed + failed + skipped.
pub fn parse_test_results(domain: MetricDomain, content: &str, origin: &Path) -> MetricFragment {
    let origin = Some(origin.to_path_buf());
    let root: Value = match serde_json::from_str(content) {
        Ok(root) => root,
        Err(e) => return MetricFragment::malformed(domain, origin, e.to_string()),
    };
    let Some(root) = root.as_object() else {
        return MetricFragment::malformed(domain, origin, "expected a JSON object at the top level");
    };

    let key = domain.as_str();
    let fields = SHAPES.iter().find_map(|shape| {
        let object = shape.locate(root, key)?;
        if shape.is_flat() && !flat_shape_belongs_to(domain, object) {
            return None;
        }
        let fields = extract_fields(domain, object);
        (!fields.is_empty()).then_some(fields)
    });

    match fields {
        Some(fields) => MetricFragment::ok(domain, origin, fields),
        None => MetricFragment::not_found(domain, origin),
    }
}

fn flat_shape_belongs_to(domain: MetricDomain, object: &Map<String, Value>) -> bool {
    let has_performance_fields = PERFORMANCE_SIGNATURE
        .iter()
        .any(|field| find_key(object, field).is_some());
    match domain {
        MetricDomain::PerformanceTests => has_performance_fields,
        _ => !has_performance_fields,
    }
}

fn find_key<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    FIELD_SYNONYMS
        .iter()
        .find(|(name, _)| *name == field)
        .and_then(|(_, keys)| keys.iter().find_map(|k| object.get(*k)))
}

fn extract_fields(
    domain: MetricDomain,
    object: &Map<String, Value>,
) -> Vec<(&'static str, FieldValue)> {
    let mut fields: Vec<(&'static str, FieldValue)> = domain
        .schema()
        .iter()
        .filter_map(|spec| {
            let raw = find_key(object, spec.name)?;
            let value = json_number(raw).unwrap_or(0.0);
            Some((spec.name, coerce(spec.kind, value)))
        })
        .collect();

    let has = |name: &str| fields.iter().any(|(n, _)| *n == name);
    if !has("total") && (has("passed") || has("failed") || has("skipped")) {
        let derived: u64 = fields
            .iter()
            .filter(|(n, _)| matches!(*n, "passed" | "failed" | "skipped"))
            .map(|(_, v)| v.as_u64())
            .sum();
        fields.push(("total", FieldValue::Count(derived)));
    }
    fields
}

fn coerce(kind: FieldKind, value: f64) -> FieldValue {
    match kind {
        FieldKind::Count => FieldValue::Count(if value > 0.0 { value as u64 } else { 0 }),
        FieldKind::Measure => FieldValue::Measure(value),
    }
}
