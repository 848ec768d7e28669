/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the engine uses to reach the
/// filesystem, version control, remote services and the console.
pub mod artifact_reader;
pub mod metrics_collector;
pub mod progress_reporter;
pub mod static_analysis_repository;
pub mod tracked_file_lister;

pub use artifact_reader::ArtifactReader;
pub use metrics_collector::{CollectorGroup, MetricsCollector};
pub use progress_reporter::ProgressReporter;
pub use static_analysis_repository::StaticAnalysisRepository;
pub use tracked_file_lister::{TrackedFile, TrackedFileLister};
