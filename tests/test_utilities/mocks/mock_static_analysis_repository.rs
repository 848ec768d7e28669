use async_trait::async_trait;
use pipeline_metrics::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
enum Behavior {
    Report(StaticAnalysisReport),
    RejectCredentials,
    Unreachable,
}

/// Mock StaticAnalysisRepository with a canned report or failure
#[derive(Clone)]
pub struct MockStaticAnalysisRepository {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockStaticAnalysisRepository {
    pub fn with_report(report: StaticAnalysisReport) -> Self {
        Self {
            behavior: Behavior::Report(report),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_auth_failure() -> Self {
        Self {
            behavior: Behavior::RejectCredentials,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_network_failure() -> Self {
        Self {
            behavior: Behavior::Unreachable,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StaticAnalysisRepository for MockStaticAnalysisRepository {
    async fn fetch_report(&self, _project_key: &str) -> Result<StaticAnalysisReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Report(report) => Ok(report.clone()),
            Behavior::RejectCredentials => Err(MetricsError::AuthFailure {
                service: "SonarQube".to_string(),
                status: 403,
            }
            .into()),
            Behavior::Unreachable => Err(MetricsError::NetworkUnavailable {
                endpoint: "http://sonar.invalid/api/measures/component".to_string(),
                details: "connection refused".to_string(),
            }
            .into()),
        }
    }
}
