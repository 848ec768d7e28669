use crate::application::dto::EmitReport;
use crate::metrics_aggregation::domain::RepositoryIdentity;
use crate::metrics_aggregation::services::{ExpositionPayload, JOB_NAME};
use crate::ports::outbound::{CollectorGroup, MetricsCollector, ProgressReporter};
use crate::shared::Result;
use anyhow::Context;

/// PushMetricsUseCase - idempotent replace of the repository's snapshot
///
/// The collector group is fixed per repository (`job="pipeline-metrics"`,
/// `instance=<repository>`), so a re-run overwrites the previous snapshot
/// instead of adding to it. The old group is deleted first on a
/// best-effort basis, then the whole payload is sent in one `PUT`.
/// Nothing is retried here.
pub struct PushMetricsUseCase<C, P> {
    collector: C,
    progress_reporter: P,
}

impl<C, P> PushMetricsUseCase<C, P>
where
    C: MetricsCollector,
    P: ProgressReporter,
{
    pub fn new(collector: C, progress_reporter: P) -> Self {
        Self {
            collector,
            progress_reporter,
        }
    }

    /// The grouping key used for `repository`
    pub fn group_for(repository: &RepositoryIdentity) -> CollectorGroup {
        CollectorGroup {
            job: JOB_NAME.to_string(),
            instance: repository.as_str().to_string(),
        }
    }

    /// Pushes `payload` as the repository's current snapshot
    ///
    /// # Returns
    /// EmitReport with `accepted_lines == attempted_lines`
    ///
    /// # Errors
    /// Returns the collector error, with the attempted line count as
    /// context, when the `PUT` fails. A failed delete is only logged.
    pub async fn execute(
        &self,
        repository: &RepositoryIdentity,
        payload: &ExpositionPayload,
    ) -> Result<EmitReport> {
        let group = Self::group_for(repository);
        let attempted_lines = payload.len();

        self.progress_reporter.report_waiting(&format!(
            "Clearing previous snapshot for instance '{}'",
            group.instance
        ));
        let stale_cleared = match self.collector.delete_group(&group).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(instance = %group.instance, "Best-effort delete failed: {:#}", e);
                false
            }
        };

        self.progress_reporter.report_waiting(&format!(
            "Pushing {} line(s) to the collector",
            attempted_lines
        ));
        self.collector
            .replace_group(&group, &payload.render())
            .await
            .with_context(|| format!("Collector accepted 0 of {} line(s)", attempted_lines))?;

        self.progress_reporter.report_completion(&format!(
            "📤 Pushed {} line(s) to job '{}', instance '{}'",
            attempted_lines, group.job, group.instance
        ));

        Ok(EmitReport {
            attempted_lines,
            accepted_lines: attempted_lines,
            stale_cleared,
        })
    }
}
