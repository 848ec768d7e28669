//! pipeline-metrics - metrics aggregation and quality scoring for CI scan results
//!
//! This library locates the artifacts left behind by heterogeneous scan
//! tools (vulnerability scanners, coverage reporters, text summaries, test
//! reports), parses each with a format-specific strategy, merges them under
//! a fixed precedence policy, derives a bounded quality score, and pushes
//! the result to a Pushgateway as an idempotent snapshot.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`metrics_aggregation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pipeline_metrics::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let repository = RepositoryIdentity::new("payments-api")?;
//! let run = RunIdentity { run_id: "1234".to_string(), run_number: Some(7) };
//!
//! // Create adapters
//! let collect = CollectMetricsUseCase::new(
//!     CachingArtifactReader::new(FileSystemReader::new()),
//!     GitTrackedFileLister::new(),
//!     None::<SonarQubeClient>,
//!     StderrProgressReporter::new(),
//! );
//!
//! // Collect, score and encode
//! let request = CollectRequest::builder(repository.clone(), run).build();
//! let response = collect.execute(request).await?;
//!
//! // Replace the repository's snapshot on the collector
//! let push = PushMetricsUseCase::new(
//!     PushgatewayClient::new("http://pushgateway:9091")?,
//!     StderrProgressReporter::new(),
//! );
//! let report = push.execute(&repository, &response.payload).await?;
//! println!("{} line(s) accepted", report.accepted_lines);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod metrics_aggregation;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{CachingArtifactReader, FileSystemReader};
    pub use crate::adapters::outbound::network::{PushgatewayClient, SonarQubeClient};
    pub use crate::adapters::outbound::vcs::GitTrackedFileLister;
    pub use crate::application::dto::{
        CollectRequest, CollectResponse, EmitReport, StaticAnalysisStatus,
    };
    pub use crate::application::use_cases::{CollectMetricsUseCase, PushMetricsUseCase};
    pub use crate::metrics_aggregation::domain::{
        CanonicalSnapshot, DomainPresence, DomainSnapshot, FieldValue, LargeArtifactRecord,
        MetricDomain, MetricFragment, ParseStatus, RepositoryIdentity, RunIdentity, Severity,
        StaticAnalysisIssue, StaticAnalysisReport, VulnerabilityRecord,
    };
    pub use crate::metrics_aggregation::policies::{ArtifactExclusion, SourcePriority};
    pub use crate::metrics_aggregation::services::{
        AggregationInput, Aggregator, ExpositionEncoder, ExpositionLine, ExpositionPayload,
        LargeArtifactScanner, ScoreCalculator, ScoreInputs, SearchRoots, SourceLocator,
    };
    pub use crate::ports::outbound::{
        ArtifactReader, CollectorGroup, MetricsCollector, ProgressReporter,
        StaticAnalysisRepository, TrackedFile, TrackedFileLister,
    };
    pub use crate::shared::error::{FailureKind, MetricsError};
    pub use crate::shared::Result;
}
