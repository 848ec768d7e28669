use crate::metrics_aggregation::domain::CanonicalSnapshot;
use crate::metrics_aggregation::services::ExpositionPayload;
use crate::shared::error::FailureKind;

/// Outcome of the static-analysis fetch for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticAnalysisStatus {
    Fetched,
    /// No service configured
    Skipped,
    Failed(FailureKind),
}

/// CollectResponse - the scored snapshot and its encoded payload
#[derive(Debug)]
pub struct CollectResponse {
    pub snapshot: CanonicalSnapshot,
    pub payload: ExpositionPayload,
    pub static_analysis: StaticAnalysisStatus,
}

impl CollectResponse {
    pub fn fields_collected(&self) -> usize {
        self.snapshot.fields_collected()
    }

    pub fn quality_score(&self) -> f64 {
        self.snapshot.quality_score().unwrap_or(0.0)
    }

    pub fn domains_present(&self) -> usize {
        self.snapshot.domains().iter().filter(|d| d.is_present()).count()
    }
}
