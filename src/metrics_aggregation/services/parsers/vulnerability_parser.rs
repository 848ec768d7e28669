use crate::metrics_aggregation::domain::{
    FieldValue, FragmentDetail, MetricDomain, MetricFragment, Severity, VulnerabilityRecord,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScanReport {
    #[serde(rename = "Results")]
    results: Option<Vec<ScanTarget>>,
}

#[derive(Debug, Deserialize)]
struct ScanTarget {
    #[serde(rename = "Vulnerabilities", default)]
    vulnerabilities: Option<Vec<ScanFinding>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScanFinding {
    #[serde(rename = "VulnerabilityID", default)]
    vulnerability_id: Value,
    #[serde(default)]
    pkg_name: Value,
    #[serde(default)]
    installed_version: Value,
    #[serde(default)]
    fixed_version: Value,
    #[serde(default)]
    severity: Value,
    #[serde(default)]
    title: Value,
}

/// A string field's text; any other JSON type counts as absent.
fn text(value: &Value) -> Option<&str> {
    value.as_str()
}

/// True when an identity field is missing, null, or a string.
fn is_identity(value: &Value) -> bool {
    value.is_null() || value.is_string()
}

/// Parses a `Results[].Vulnerabilities[]` scanner report.
///
/// Findings are deduplicated by (id, package) before counting; a finding
/// whose id or package is not a string is skipped on its own. A report
/// with a `Results` array is a completed scan, so an empty one is a real
/// zero; a document without `Results` carries no vulnerability data.
pub fn parse_vulnerability_report(content: &str, origin: &Path) -> MetricFragment {
    let origin_buf = Some(origin.to_path_buf());
    let report: ScanReport = match serde_json::from_str(content) {
        Ok(report) => report,
        Err(e) => {
            let details = e.to_string();
            return MetricFragment::malformed(MetricDomain::Vulnerabilities, origin_buf, details);
        }
    };

    let Some(targets) = report.results else {
        return MetricFragment::not_found(MetricDomain::Vulnerabilities, origin_buf);
    };

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut records: Vec<VulnerabilityRecord> = Vec::new();
    for finding in targets.into_iter().flat_map(|t| t.vulnerabilities.unwrap_or_default()) {
        if !is_identity(&finding.vulnerability_id) || !is_identity(&finding.pkg_name) {
            tracing::debug!(
                origin = %origin.display(),
                "Skipping finding with a non-string id or package"
            );
            continue;
        }
        let id = text(&finding.vulnerability_id).unwrap_or_default().to_string();
        let package = text(&finding.pkg_name).unwrap_or_default().to_string();
        if !seen.insert((id.clone(), package.clone())) {
            continue;
        }
        let title = text(&finding.title)
            .filter(|t| !t.trim().is_empty())
            .map_or_else(|| id.clone(), str::to_string);
        records.push(VulnerabilityRecord {
            id,
            package,
            installed_version: text(&finding.installed_version).unwrap_or_default().to_string(),
            fixed_version: text(&finding.fixed_version)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            severity: Severity::parse(text(&finding.severity).unwrap_or_default()),
            title,
        });
    }

    let (mut critical, mut high, mut medium, mut low) = (0u64, 0u64, 0u64, 0u64);
    for record in &records {
        match record.severity {
            Severity::Critical => critical += 1,
            Severity::High => high += 1,
            Severity::Medium => medium += 1,
            Severity::Low => low += 1,
            Severity::Unknown => {}
        }
    }

    MetricFragment::ok(
        MetricDomain::Vulnerabilities,
        origin_buf,
        [
            ("critical", FieldValue::Count(critical)),
            ("high", FieldValue::Count(high)),
            ("medium", FieldValue::Count(medium)),
            ("low", FieldValue::Count(low)),
            ("total", FieldValue::Count(records.len() as u64)),
        ],
    )
    .with_detail(FragmentDetail::Vulnerabilities(records))
}
