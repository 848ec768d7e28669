mod aggregator;
pub mod exposition;
mod large_artifact_scanner;
pub mod parsers;
mod score_calculator;
mod source_locator;

pub use aggregator::{AggregationInput, Aggregator, STATIC_ANALYSIS_ORIGIN};
pub use exposition::{ExpositionEncoder, ExpositionLine, ExpositionPayload, JOB_NAME};
pub use large_artifact_scanner::{
    LargeArtifactScanner, DEFAULT_MIN_SIZE_BYTES, TRACKED_FILES_ORIGIN,
};
pub use score_calculator::{ScoreCalculator, ScoreInputs};
pub use source_locator::{SearchRoots, SourceLocator};
