use crate::metrics_aggregation::domain::{
    CanonicalSnapshot, DomainSnapshot, FieldValue, FragmentDetail, MetricDomain, MetricFragment,
    ParseStatus, RepositoryIdentity, RunIdentity, StaticAnalysisReport,
};
use crate::metrics_aggregation::policies::SourcePriority;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Origin recorded when coverage comes from the static-analysis service.
pub const STATIC_ANALYSIS_ORIGIN: &str = "static-analysis";

/// Everything the aggregator merges for one run
#[derive(Debug, Default)]
pub struct AggregationInput {
    /// Parse attempts per domain, in source-priority order
    pub fragments: BTreeMap<MetricDomain, Vec<MetricFragment>>,
    /// Report from the static-analysis service, when it was reachable
    pub static_analysis: Option<StaticAnalysisReport>,
}

impl AggregationInput {
    pub fn push(&mut self, fragment: MetricFragment) {
        self.fragments.entry(fragment.domain()).or_default().push(fragment);
    }
}

/// Aggregator - merges parse attempts into the canonical snapshot
///
/// Per domain the first usable fragment wins; domains without one are
/// reported absent with all fields zero. Cross-domain rules:
/// - `quality_issues.large_files` mirrors the tracked-file scan, never the
///   text summary, whenever the quality domain is present
/// - `quality_issues.total_improvements` is derived from its sub-counters
///   when the summary gave no explicit total
/// - coverage falls back to the static-analysis measure only when no
///   artifact produced a coverage value
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(
        repository: RepositoryIdentity,
        run: RunIdentity,
        collected_at: DateTime<Utc>,
        input: AggregationInput,
    ) -> CanonicalSnapshot {
        let AggregationInput {
            mut fragments,
            static_analysis,
        } = input;

        let mut merged: BTreeMap<MetricDomain, DomainSnapshot> = BTreeMap::new();
        let mut explicit_total: Option<u64> = None;

        for domain in MetricDomain::ALL {
            let attempts = fragments.remove(&domain).unwrap_or_default();
            let winner = Self::select(domain, attempts);
            if domain == MetricDomain::QualityIssues {
                explicit_total = winner
                    .as_ref()
                    .and_then(|f| f.field("total_improvements"))
                    .map(|v| v.as_u64());
            }
            let snapshot = match winner {
                Some(fragment) => DomainSnapshot::from_fragment(fragment),
                None => DomainSnapshot::absent(domain),
            };
            merged.insert(domain, snapshot);
        }

        Self::reconcile_quality(&mut merged, explicit_total);
        Self::apply_coverage_fallback(&mut merged, static_analysis.as_ref());

        CanonicalSnapshot::new(repository, run, collected_at, merged, static_analysis)
    }

    fn select(domain: MetricDomain, attempts: Vec<MetricFragment>) -> Option<MetricFragment> {
        for attempt in attempts.iter().take_while(|f| !f.is_usable()) {
            let origin = attempt
                .origin()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            match attempt.status() {
                ParseStatus::Malformed(details) => {
                    tracing::warn!(
                        domain = %domain,
                        origin = %origin,
                        "Discarding malformed artifact: {}",
                        details
                    )
                }
                _ => {
                    tracing::debug!(domain = %domain, origin = %origin, "Artifact has no data")
                }
            }
        }

        let winner = SourcePriority::select(attempts);
        match &winner {
            Some(fragment) => tracing::info!(
                domain = %domain,
                origin = %fragment.origin().map(|p| p.display().to_string()).unwrap_or_default(),
                "Selected source"
            ),
            None => tracing::debug!(domain = %domain, "No usable source; domain reported absent"),
        }
        winner
    }

    fn reconcile_quality(
        merged: &mut BTreeMap<MetricDomain, DomainSnapshot>,
        explicit_total: Option<u64>,
    ) {
        let scanned_large = merged
            .get(&MetricDomain::LargeArtifacts)
            .map(|d| d.count("count"))
            .unwrap_or(0);

        let Some(quality) = merged.get_mut(&MetricDomain::QualityIssues) else {
            return;
        };
        if !quality.is_present() {
            return;
        }

        let reported_large = quality.count("large_files");
        if reported_large != scanned_large {
            tracing::debug!(
                reported = reported_large,
                scanned = scanned_large,
                "Replacing large-file count from summary with tracked-file scan"
            );
        }
        quality.set("large_files", FieldValue::Count(scanned_large));

        let total = SourcePriority::resolve_total(
            explicit_total,
            &[
                quality.count("todo_comments"),
                quality.count("debug_statements"),
                scanned_large,
            ],
        );
        quality.set("total_improvements", FieldValue::Count(total));
    }

    fn apply_coverage_fallback(
        merged: &mut BTreeMap<MetricDomain, DomainSnapshot>,
        static_analysis: Option<&StaticAnalysisReport>,
    ) {
        let file_value = merged
            .get(&MetricDomain::Coverage)
            .filter(|d| d.is_present())
            .map(|d| d.value("percent"));
        if file_value.is_some() {
            return;
        }

        let service_value = static_analysis.and_then(|r| r.coverage);
        if let Some(percent) = SourcePriority::select_coverage(file_value, service_value) {
            tracing::info!(percent, "Using static-analysis coverage; no coverage artifact found");
            merged.insert(
                MetricDomain::Coverage,
                DomainSnapshot::derived(
                    MetricDomain::Coverage,
                    STATIC_ANALYSIS_ORIGIN,
                    [("percent", FieldValue::Measure(percent.clamp(0.0, 100.0)))],
                    FragmentDetail::None,
                ),
            );
        }
    }
}
