use crate::metrics_aggregation::domain::{FieldValue, MetricDomain, MetricFragment};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A counter and the label phrasings that report it, strongest first.
struct CounterPattern {
    field: &'static str,
    patterns: Vec<Regex>,
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("valid regex"))
        .collect()
}

static QUALITY_COUNTERS: LazyLock<Vec<CounterPattern>> = LazyLock::new(|| {
    vec![
        CounterPattern {
            field: "todo_comments",
            patterns: patterns(&[
                r"(?i)TODO/FIXME\s+comments?\s*:\s*(\d+)",
                r"(?i)TODO[^\n:]*?comments?\s*:\s*(\d+)",
                r"(?i)TODO/FIXME[^\n:]*:\s*(\d+)",
            ]),
        },
        CounterPattern {
            field: "debug_statements",
            patterns: patterns(&[
                r"(?i)Debug\s+statements?\s*:\s*(\d+)",
                r"(?i)Debug[^\n:]*:\s*(\d+)",
            ]),
        },
        CounterPattern {
            field: "large_files",
            patterns: patterns(&[
                r"(?i)Large\s+files?\s*\(\s*>\s*1\s*MB\s*\)\s*:\s*(\d+)",
                r"(?i)Large\s+files?[^\n:]*:\s*(\d+)",
            ]),
        },
        CounterPattern {
            field: "total_improvements",
            patterns: patterns(&[
                r"(?i)Total\s+suggestions\s*:\s*(\d+)",
                r"(?i)Total\s+improvements\s*:\s*(\d+)",
            ]),
        },
        CounterPattern {
            field: "files_scanned",
            patterns: patterns(&[
                r"(?i)Files\s+scanned\s*:\s*(\d+)",
                r"(?i)Total\s+files\s*:\s*(\d+)",
            ]),
        },
    ]
});

/// Extracts labelled counters from a free-text quality scan summary.
///
/// Each counter takes the first matching phrasing; counters with no
/// matching line are left out of the fragment rather than zeroed, so the
/// aggregator can tell an explicit total from a missing one.
pub fn parse_quality_text(content: &str, origin: &Path) -> MetricFragment {
    let fields: Vec<(&'static str, FieldValue)> = QUALITY_COUNTERS
        .iter()
        .filter_map(|counter| {
            counter
                .patterns
                .iter()
                .find_map(|re| re.captures(content)?.get(1)?.as_str().parse::<u64>().ok())
                .map(|value| (counter.field, FieldValue::Count(value)))
        })
        .collect();

    MetricFragment::ok(MetricDomain::QualityIssues, Some(origin.to_path_buf()), fields)
}
