use crate::shared::Result;
use async_trait::async_trait;

/// Grouping key under which a snapshot is stored on the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorGroup {
    pub job: String,
    pub instance: String,
}

/// MetricsCollector port for the push-accepting metrics endpoint
///
/// A group is replaced as a whole: `replace_group` overwrites every metric
/// previously pushed under the same (job, instance) key.
#[async_trait]
pub trait MetricsCollector: Send + Sync {
    /// Deletes everything stored under `group`
    ///
    /// # Errors
    /// Returns an error if the collector is unreachable or answers non-2xx.
    /// Callers treat this as best-effort.
    async fn delete_group(&self, group: &CollectorGroup) -> Result<()>;

    /// Replaces the group's metrics with `payload` in a single request
    ///
    /// # Arguments
    /// * `group` - Grouping key (job, instance)
    /// * `payload` - Complete exposition-format body, newline-terminated
    ///
    /// # Errors
    /// Returns an error if:
    /// - The collector is unreachable or the request times out
    /// - The collector answers a non-2xx status
    async fn replace_group(&self, group: &CollectorGroup, payload: &str) -> Result<()>;
}
