use super::{json_number, json_path};
use crate::metrics_aggregation::domain::{ArtifactFormat, FieldValue, MetricDomain, MetricFragment};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

/// Where a coverage percentage may live in a JSON report, tried in order.
const JSON_COVERAGE_PATHS: &[&[&str]] = &[
    &["coverage"],
    &["tests", "coverage"],
    &["summary", "coverage"],
    // coverage.py `coverage json` output
    &["totals", "percent_covered"],
];

static COVERAGE_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<coverage\b([^>]*)>").expect("valid regex"));

static XML_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
    });

/// Label-followed-by-number patterns, strongest first.
static TEXT_COVERAGE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?im)\bcoverage\s*:\s*([0-9]+(?:\.[0-9]+)?)\s*%?").expect("valid regex"),
        // pytest-cov / coverage report summary row: "TOTAL   120   30   75%"
        Regex::new(r"(?im)^\s*(?:coverage|total)\b.*?([0-9]+(?:\.[0-9]+)?)\s*%")
            .expect("valid regex"),
    ]
});

/// Parses a coverage artifact with the strategy matching its format.
///
/// The percentage is clamped to [0, 100]. A present 0 is a valid value.
pub fn parse_coverage(format: ArtifactFormat, content: &str, origin: &Path) -> MetricFragment {
    let origin = Some(origin.to_path_buf());
    let outcome = match format {
        ArtifactFormat::CoverageJson => from_json(content),
        ArtifactFormat::CoberturaXml => from_cobertura(content),
        ArtifactFormat::Lcov => from_lcov(content),
        ArtifactFormat::CoverageText => Ok(from_text(content)),
        _ => Ok(None),
    };

    match outcome {
        Ok(Some(percent)) => MetricFragment::ok(
            MetricDomain::Coverage,
            origin,
            [("percent", FieldValue::Measure(percent.clamp(0.0, 100.0)))],
        ),
        Ok(None) => MetricFragment::not_found(MetricDomain::Coverage, origin),
        Err(details) => MetricFragment::malformed(MetricDomain::Coverage, origin, details),
    }
}

fn from_json(content: &str) -> Result<Option<f64>, String> {
    let root: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(JSON_COVERAGE_PATHS
        .iter()
        .find_map(|path| json_path(&root, path).and_then(json_number)))
}

fn from_cobertura(content: &str) -> Result<Option<f64>, String> {
    let Some(root) = COVERAGE_ROOT.captures(content) else {
        if content.trim_start().starts_with('<') {
            return Ok(None);
        }
        return Err("not an XML document".to_string());
    };

    let attributes: Vec<(String, String)> = XML_ATTRIBUTE
        .captures_iter(&root[1])
        .filter_map(|c| {
            let value = c.get(2).or_else(|| c.get(3))?;
            Some((c[1].to_string(), value.as_str().to_string()))
        })
        .collect();
    let attribute = |names: &[&str]| -> Option<&str> {
        attributes
            .iter()
            .find(|(name, _)| names.contains(&name.as_str()))
            .map(|(_, value)| value.as_str())
    };
    let number = |raw: &str| -> Result<f64, String> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("non-numeric coverage attribute '{}'", raw))
    };

    if let Some(rate) = attribute(&["line-rate", "line_rate"]) {
        return Ok(Some(number(rate)? * 100.0));
    }

    match (
        attribute(&["lines-valid", "lines_valid"]),
        attribute(&["lines-covered", "lines_covered"]),
    ) {
        (Some(valid), Some(covered)) => {
            let valid = number(valid)?;
            let covered = number(covered)?;
            if valid > 0.0 {
                Ok(Some(covered / valid * 100.0))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

fn from_lcov(content: &str) -> Result<Option<f64>, String> {
    let mut lines_found: u64 = 0;
    let mut lines_hit: u64 = 0;
    let mut saw_record = false;

    for line in content.lines().map(str::trim) {
        let (target, raw) = if let Some(raw) = line.strip_prefix("LF:") {
            (&mut lines_found, raw)
        } else if let Some(raw) = line.strip_prefix("LH:") {
            (&mut lines_hit, raw)
        } else {
            continue;
        };
        let value: u64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid LCOV counter '{}'", line))?;
        *target += value;
        saw_record = true;
    }

    if !saw_record || lines_found == 0 {
        return Ok(None);
    }
    Ok(Some(lines_hit as f64 / lines_found as f64 * 100.0))
}

fn from_text(content: &str) -> Option<f64> {
    TEXT_COVERAGE.iter().find_map(|pattern| {
        pattern
            .captures(content)
            .and_then(|c| c[1].parse::<f64>().ok())
    })
}
