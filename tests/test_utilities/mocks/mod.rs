/// Mock implementations for testing
mod mock_artifact_reader;
mod mock_metrics_collector;
mod mock_progress_reporter;
mod mock_static_analysis_repository;
mod mock_tracked_file_lister;

pub use mock_artifact_reader::MockArtifactReader;
pub use mock_metrics_collector::MockMetricsCollector;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_static_analysis_repository::MockStaticAnalysisRepository;
pub use mock_tracked_file_lister::MockTrackedFileLister;
