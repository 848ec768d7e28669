use crate::metrics_aggregation::domain::StaticAnalysisReport;
use crate::shared::Result;
use async_trait::async_trait;

/// StaticAnalysisRepository port for fetching measures and open issues
///
/// Implementations talk to a static-analysis server with bearer-token
/// authentication. Failures are classified through `MetricsError`:
/// rejected credentials are `AuthFailure`, everything else
/// `NetworkUnavailable`.
#[async_trait]
pub trait StaticAnalysisRepository: Send + Sync {
    /// Fetches the report for one project
    ///
    /// # Arguments
    /// * `project_key` - The project's key on the analysis server
    ///
    /// # Returns
    /// Project measures (coverage, bugs, vulnerabilities, code smells),
    /// open-issue counts per severity, and the open issues themselves
    ///
    /// # Errors
    /// Returns an error if:
    /// - The server is unreachable or times out
    /// - The token is rejected (HTTP 401/403)
    /// - The server answers any other non-2xx status
    async fn fetch_report(&self, project_key: &str) -> Result<StaticAnalysisReport>;
}
