//! Format-specific artifact parsers.
//!
//! Every parser is a pure function from artifact text to a
//! [`MetricFragment`]. None of them return errors: unreadable input becomes
//! a `malformed` fragment, input without the domain's data a `not_found`
//! one.

mod coverage_parser;
mod quality_text_parser;
mod test_results_parser;
mod vulnerability_parser;

pub use coverage_parser::parse_coverage;
pub use quality_text_parser::parse_quality_text;
pub use test_results_parser::parse_test_results;
pub use vulnerability_parser::parse_vulnerability_report;

use crate::metrics_aggregation::domain::{
    ArtifactFormat, MetricDomain, MetricFragment, SourceCandidate,
};
use serde_json::Value;

/// Parses `content` read from `candidate` as evidence for `domain`.
///
/// A format that carries no data for the domain (e.g. a Trivy report asked
/// for coverage) yields `not_found`.
pub fn parse_artifact(
    domain: MetricDomain,
    candidate: &SourceCandidate,
    content: &str,
) -> MetricFragment {
    let origin = &candidate.path;
    match (domain, candidate.format) {
        (MetricDomain::Vulnerabilities, ArtifactFormat::TrivyJson) => {
            parse_vulnerability_report(content, origin)
        }
        (
            MetricDomain::Coverage,
            format @ (ArtifactFormat::CoverageJson
            | ArtifactFormat::CoberturaXml
            | ArtifactFormat::Lcov
            | ArtifactFormat::CoverageText),
        ) => parse_coverage(format, content, origin),
        (MetricDomain::QualityIssues, ArtifactFormat::QualityText) => {
            parse_quality_text(content, origin)
        }
        (
            MetricDomain::UnitTests | MetricDomain::PerformanceTests,
            ArtifactFormat::TestResultsJson,
        ) => parse_test_results(domain, content, origin),
        _ => MetricFragment::not_found(domain, Some(origin.clone())),
    }
}

/// Reads a JSON number, or a string holding one (`"82.5"`, `"82.5%"`).
pub(crate) fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Follows a key path through nested JSON objects.
pub(crate) fn json_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(*key))
}
