use crate::application::dto::{CollectRequest, CollectResponse, StaticAnalysisStatus};
use crate::metrics_aggregation::domain::{
    MetricDomain, MetricFragment, RepositoryIdentity, StaticAnalysisReport,
};
use crate::metrics_aggregation::policies::ArtifactExclusion;
use crate::metrics_aggregation::services::parsers::parse_artifact;
use crate::metrics_aggregation::services::{
    AggregationInput, Aggregator, ExpositionEncoder, LargeArtifactScanner, ScoreCalculator,
    SourceLocator,
};
use crate::ports::outbound::{
    ArtifactReader, ProgressReporter, StaticAnalysisRepository, TrackedFileLister,
};
use crate::shared::error::{classify, FailureKind};
use crate::shared::Result;
use chrono::Utc;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// CollectMetricsUseCase - builds the scored snapshot for one run
///
/// Orchestrates SourceLocator → parsers → Aggregator → ScoreCalculator and
/// encodes the result. Per-domain failures never escape: a missing or
/// malformed artifact only leaves its domain absent.
///
/// # Type Parameters
/// * `R` - ArtifactReader implementation (shared across parse tasks)
/// * `L` - TrackedFileLister implementation
/// * `S` - StaticAnalysisRepository implementation (optional)
/// * `P` - ProgressReporter implementation
pub struct CollectMetricsUseCase<R, L, S, P> {
    artifact_reader: Arc<R>,
    tracked_file_lister: Arc<L>,
    static_analysis: Option<S>,
    progress_reporter: P,
}

impl<R, L, S, P> CollectMetricsUseCase<R, L, S, P>
where
    R: ArtifactReader + 'static,
    L: TrackedFileLister + 'static,
    S: StaticAnalysisRepository,
    P: ProgressReporter,
{
    pub fn new(
        artifact_reader: R,
        tracked_file_lister: L,
        static_analysis: Option<S>,
        progress_reporter: P,
    ) -> Self {
        Self {
            artifact_reader: Arc::new(artifact_reader),
            tracked_file_lister: Arc::new(tracked_file_lister),
            static_analysis,
            progress_reporter,
        }
    }

    /// Executes one collection pass
    ///
    /// # Errors
    /// Only invalid request data fails the pass (e.g. a malformed exclusion
    /// pattern). Unreadable artifacts and unreachable services degrade the
    /// snapshot instead.
    pub async fn execute(&self, request: CollectRequest) -> Result<CollectResponse> {
        self.progress_reporter.report(&format!(
            "🔎 Collecting metrics for repository: {}",
            request.repository
        ));

        // Step 1: Validate exclusion patterns before any work starts
        let exclusion = Arc::new(ArtifactExclusion::new(request.exclude_patterns.clone())?);

        // Step 2: Parse file-backed domains and scan tracked files in parallel
        let mut input = self.collect_fragments(&request, exclusion).await;

        // Step 3: Fetch the static-analysis report, if a service is configured
        let (report, static_analysis) = self.fetch_static_analysis(&request.repository).await;
        input.static_analysis = report;

        // Step 4: Merge, then score
        let snapshot = Aggregator::aggregate(request.repository, request.run, Utc::now(), input);
        let score = ScoreCalculator::score(&snapshot);
        let snapshot = snapshot.with_quality_score(score);

        // Step 5: Encode
        let payload = ExpositionEncoder::encode(&snapshot);

        let response = CollectResponse {
            snapshot,
            payload,
            static_analysis,
        };
        self.progress_reporter.report_completion(&format!(
            "✅ {} of {} domain(s) present, quality score {:.2}",
            response.domains_present(),
            MetricDomain::ALL.len(),
            response.quality_score()
        ));

        Ok(response)
    }

    async fn collect_fragments(
        &self,
        request: &CollectRequest,
        exclusion: Arc<ArtifactExclusion>,
    ) -> AggregationInput {
        let locator = SourceLocator::new(request.search_roots.clone());
        let mut tasks = Vec::new();

        for domain in MetricDomain::ALL.into_iter().filter(|d| d.is_file_backed()) {
            let reader = Arc::clone(&self.artifact_reader);
            let locator = locator.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                parse_domain(domain, &locator, &*reader)
            }));
        }

        let lister = Arc::clone(&self.tracked_file_lister);
        let repository_root: PathBuf = request.repository_root.clone();
        let threshold = request.large_file_threshold_bytes;
        tasks.push(tokio::task::spawn_blocking(move || {
            let scanner = LargeArtifactScanner::new(&*lister, &*exclusion);
            vec![scanner.scan_fragment(&repository_root, threshold)]
        }));

        let mut input = AggregationInput::default();
        for joined in join_all(tasks).await {
            match joined {
                Ok(fragments) => fragments.into_iter().for_each(|f| input.push(f)),
                Err(e) => tracing::warn!("Collection task did not complete: {}", e),
            }
        }
        input
    }

    async fn fetch_static_analysis(
        &self,
        repository: &RepositoryIdentity,
    ) -> (Option<StaticAnalysisReport>, StaticAnalysisStatus) {
        let Some(service) = self.static_analysis.as_ref() else {
            tracing::debug!(
                kind = %FailureKind::SourceAbsent,
                "Static-analysis service not configured"
            );
            return (None, StaticAnalysisStatus::Skipped);
        };

        self.progress_reporter
            .report_waiting("Fetching static-analysis report");

        match service.fetch_report(repository.as_str()).await {
            Ok(report) => {
                self.progress_reporter.report(&format!(
                    "✅ Static analysis: {} open issue(s)",
                    report.issues.len()
                ));
                (Some(report), StaticAnalysisStatus::Fetched)
            }
            Err(e) => {
                let kind = classify(&e);
                tracing::warn!(kind = %kind, "Static-analysis fetch failed: {:#}", e);
                let message = match kind {
                    FailureKind::AuthFailure => {
                        "⚠️  Static-analysis credentials rejected; using file-based values only"
                    }
                    _ => {
                        "⚠️  Static-analysis service unavailable; using file-based values only"
                    }
                };
                self.progress_reporter.report_error(message);
                (None, StaticAnalysisStatus::Failed(kind))
            }
        }
    }
}

/// Tries each existing candidate for `domain` in order, stopping at the
/// first usable fragment. Earlier unusable attempts are kept so the
/// aggregator can log them.
fn parse_domain<R: ArtifactReader + ?Sized>(
    domain: MetricDomain,
    locator: &SourceLocator,
    reader: &R,
) -> Vec<MetricFragment> {
    let mut attempts = Vec::new();

    for candidate in locator.locate_all(domain, reader) {
        let fragment = match reader.read_artifact(&candidate.path) {
            Ok(content) => parse_artifact(domain, &candidate, &content),
            Err(e) => {
                MetricFragment::malformed(domain, Some(candidate.path.clone()), e.to_string())
            }
        };
        let usable = fragment.is_usable();
        attempts.push(fragment);
        if usable {
            break;
        }
    }

    attempts
}
