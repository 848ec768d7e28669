pub mod fragment;
pub mod large_artifact;
pub mod metric_domain;
pub mod repository_identity;
pub mod snapshot;
pub mod static_analysis;
pub mod vulnerability;

pub use fragment::{FieldValue, FragmentDetail, MetricFragment, ParseStatus};
pub use large_artifact::LargeArtifactRecord;
pub use metric_domain::{ArtifactFormat, FieldKind, FieldSpec, MetricDomain, SourceCandidate};
pub use repository_identity::RepositoryIdentity;
pub use snapshot::{CanonicalSnapshot, DomainPresence, DomainSnapshot, RunIdentity};
pub use static_analysis::{StaticAnalysisIssue, StaticAnalysisReport, ISSUE_SEVERITIES};
pub use vulnerability::{Severity, VulnerabilityRecord};
