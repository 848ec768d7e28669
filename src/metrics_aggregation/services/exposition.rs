//! Line-oriented exposition encoding of a canonical snapshot.
//!
//! Output follows the Prometheus text format accepted by a Pushgateway:
//! one `name{label="value",...} number` sample per line.

use crate::metrics_aggregation::domain::{
    CanonicalSnapshot, MetricDomain, StaticAnalysisReport, ISSUE_SEVERITIES,
};
use std::fmt;

/// Fixed job name of the collector grouping key
pub const JOB_NAME: &str = "pipeline-metrics";

/// Free-text label values longer than this are truncated (in characters)
pub const MAX_LABEL_LENGTH: usize = 200;

/// Labels holding descriptive text rather than part of a series identity.
/// Only these are truncated; identifying labels such as `path` or `id` are
/// emitted in full so distinct series never collapse into one.
const FREE_TEXT_LABELS: &[&str] = &["title"];

/// One sample line
#[derive(Debug, Clone, PartialEq)]
pub struct ExpositionLine {
    name: &'static str,
    labels: Vec<(&'static str, String)>,
    value: f64,
}

impl ExpositionLine {
    pub fn new(name: &'static str, labels: Vec<(&'static str, String)>, value: f64) -> Self {
        Self { name, labels, value }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ExpositionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if !self.labels.is_empty() {
            f.write_str("{")?;
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                let value = if FREE_TEXT_LABELS.contains(key) {
                    truncate_free_text(value.as_str())
                } else {
                    value.as_str()
                };
                write!(f, "{}=\"{}\"", key, escape_label_value(value))?;
            }
            f.write_str("}")?;
        }
        write!(f, " {}", format_value(self.value))
    }
}

/// The complete payload for one push
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpositionPayload {
    lines: Vec<ExpositionLine>,
}

impl ExpositionPayload {
    pub fn lines(&self) -> &[ExpositionLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line with `name` whose labels include every pair in `labels`.
    pub fn find(&self, name: &str, labels: &[(&str, &str)]) -> Option<&ExpositionLine> {
        self.lines.iter().find(|line| {
            line.name == name && labels.iter().all(|(k, v)| line.label(k) == Some(*v))
        })
    }

    /// Renders the request body, one sample per line, newline-terminated.
    pub fn render(&self) -> String {
        let mut body = String::new();
        for line in &self.lines {
            body.push_str(&line.to_string());
            body.push('\n');
        }
        body
    }

    fn push(&mut self, name: &'static str, labels: Vec<(&'static str, String)>, value: f64) {
        self.lines.push(ExpositionLine::new(name, labels, value));
    }
}

impl From<Vec<ExpositionLine>> for ExpositionPayload {
    fn from(lines: Vec<ExpositionLine>) -> Self {
        Self { lines }
    }
}

/// Schema field -> metric name, with a scale factor applied to the value.
struct FieldMetric {
    metric: &'static str,
    domain: MetricDomain,
    field: &'static str,
    scale: f64,
}

const fn field_metric(
    metric: &'static str,
    domain: MetricDomain,
    field: &'static str,
) -> FieldMetric {
    FieldMetric {
        metric,
        domain,
        field,
        scale: 1.0,
    }
}

const FIELD_METRICS: &[FieldMetric] = &[
    field_metric("tests_coverage_percentage", MetricDomain::Coverage, "percent"),
    field_metric("security_vulnerabilities_total", MetricDomain::Vulnerabilities, "total"),
    field_metric("code_quality_todo_comments", MetricDomain::QualityIssues, "todo_comments"),
    field_metric("code_quality_debug_statements", MetricDomain::QualityIssues, "debug_statements"),
    field_metric("code_quality_large_files", MetricDomain::QualityIssues, "large_files"),
    field_metric(
        "code_quality_total_improvements",
        MetricDomain::QualityIssues,
        "total_improvements",
    ),
    field_metric("code_quality_files_scanned", MetricDomain::QualityIssues, "files_scanned"),
    field_metric("unit_tests_total", MetricDomain::UnitTests, "total"),
    field_metric("unit_tests_passed", MetricDomain::UnitTests, "passed"),
    field_metric("unit_tests_failed", MetricDomain::UnitTests, "failed"),
    field_metric("unit_tests_skipped", MetricDomain::UnitTests, "skipped"),
    field_metric("unit_tests_coverage_percentage", MetricDomain::UnitTests, "coverage"),
    field_metric("unit_tests_duration_seconds", MetricDomain::UnitTests, "duration_seconds"),
    field_metric("performance_tests_total", MetricDomain::PerformanceTests, "total"),
    field_metric("performance_tests_passed", MetricDomain::PerformanceTests, "passed"),
    field_metric("performance_tests_failed", MetricDomain::PerformanceTests, "failed"),
    field_metric(
        "performance_avg_response_time_ms",
        MetricDomain::PerformanceTests,
        "avg_response_time_ms",
    ),
    field_metric(
        "performance_p95_response_time_ms",
        MetricDomain::PerformanceTests,
        "p95_response_time_ms",
    ),
    field_metric(
        "performance_p99_response_time_ms",
        MetricDomain::PerformanceTests,
        "p99_response_time_ms",
    ),
    FieldMetric {
        metric: "performance_error_rate_percentage",
        domain: MetricDomain::PerformanceTests,
        field: "error_rate",
        scale: 100.0,
    },
    field_metric("performance_throughput_rps", MetricDomain::PerformanceTests, "throughput_rps"),
    field_metric("large_files_total", MetricDomain::LargeArtifacts, "count"),
    field_metric("large_files_bytes_total", MetricDomain::LargeArtifacts, "total_bytes"),
];

const SEVERITY_BUCKETS: [&str; 4] = ["critical", "high", "medium", "low"];

/// ExpositionEncoder - turns a snapshot into exposition lines
pub struct ExpositionEncoder;

impl ExpositionEncoder {
    pub fn encode(snapshot: &CanonicalSnapshot) -> ExpositionPayload {
        let repository = snapshot.repository().as_str().to_string();
        let repo = || vec![("repository", repository.clone())];
        let mut payload = ExpositionPayload::default();

        let run = snapshot.run();
        payload.push(
            "pipeline_run_info",
            vec![("repository", repository.clone()), ("run_id", run.run_id.clone())],
            1.0,
        );
        if let Some(number) = run.run_number {
            payload.push("pipeline_run_number", repo(), number as f64);
        }
        payload.push(
            "pipeline_metrics_collected_timestamp_seconds",
            repo(),
            snapshot.collected_at().timestamp() as f64,
        );

        for domain in snapshot.domains() {
            payload.push(
                "pipeline_metrics_domain_present",
                vec![
                    ("repository", repository.clone()),
                    ("domain", domain.domain().as_str().to_string()),
                ],
                if domain.is_present() { 1.0 } else { 0.0 },
            );
        }

        for metric in FIELD_METRICS {
            let value = snapshot.domain(metric.domain).value(metric.field) * metric.scale;
            payload.push(metric.metric, repo(), value);
        }

        if let Some(score) = snapshot.quality_score() {
            payload.push("code_quality_score", repo(), score);
        }

        let vulnerabilities = snapshot.domain(MetricDomain::Vulnerabilities);
        for bucket in SEVERITY_BUCKETS {
            payload.push(
                "security_vulnerabilities_found",
                vec![("repository", repository.clone()), ("severity", bucket.to_string())],
                vulnerabilities.value(bucket),
            );
        }
        for record in vulnerabilities.vulnerabilities() {
            payload.push(
                "security_vulnerability_info",
                vec![
                    ("repository", repository.clone()),
                    ("id", record.id.clone()),
                    ("severity", record.severity.as_str().to_string()),
                    ("package", record.package.clone()),
                    ("installed", record.installed_version.clone()),
                    ("fixed", record.fixed_version.clone().unwrap_or_default()),
                    ("title", record.title.clone()),
                ],
                1.0,
            );
        }

        for record in snapshot.domain(MetricDomain::LargeArtifacts).large_artifacts() {
            payload.push(
                "large_file_size_bytes",
                vec![
                    ("repository", repository.clone()),
                    ("path", record.relative_path.clone()),
                ],
                record.size_bytes as f64,
            );
        }

        if let Some(report) = snapshot.static_analysis() {
            Self::encode_static_analysis(&mut payload, &repository, report);
        }

        payload
    }

    fn encode_static_analysis(
        payload: &mut ExpositionPayload,
        project: &str,
        report: &StaticAnalysisReport,
    ) {
        let project_label = || vec![("project", project.to_string())];

        if let Some(coverage) = report.coverage {
            payload.push("sonarqube_coverage", project_label(), coverage);
        }
        payload.push("sonarqube_bugs", project_label(), report.bugs as f64);
        payload.push("sonarqube_vulnerabilities", project_label(), report.vulnerabilities as f64);
        payload.push("sonarqube_code_smells", project_label(), report.code_smells as f64);

        for severity in ISSUE_SEVERITIES {
            payload.push(
                "sonarqube_issues_by_severity",
                vec![("project", project.to_string()), ("severity", severity.to_string())],
                report.issues_with_severity(severity) as f64,
            );
        }

        for issue in &report.issues {
            payload.push(
                "sonarqube_issue_info",
                vec![
                    ("project", project.to_string()),
                    ("key", issue.key.clone()),
                    ("type", issue.issue_type.clone()),
                    ("severity", issue.severity.clone()),
                    ("file", issue.file.clone()),
                    ("line", issue.line.map(|l| l.to_string()).unwrap_or_default()),
                ],
                1.0,
            );
        }
    }
}

/// Cuts a free-text value to `MAX_LABEL_LENGTH` characters.
fn truncate_free_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_LABEL_LENGTH) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Escapes a label value for the text exposition format.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "+Inf" } else { "-Inf" }).to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
