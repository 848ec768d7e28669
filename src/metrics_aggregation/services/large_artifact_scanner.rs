use crate::metrics_aggregation::domain::{
    FieldValue, FragmentDetail, LargeArtifactRecord, MetricDomain, MetricFragment,
};
use crate::metrics_aggregation::policies::ArtifactExclusion;
use crate::ports::outbound::TrackedFileLister;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Files at or above this size count as large artifacts (1 MB, decimal)
pub const DEFAULT_MIN_SIZE_BYTES: u64 = 1_000_000;

/// Origin recorded on fragments produced by the scan
pub const TRACKED_FILES_ORIGIN: &str = "vcs:tracked-files";

/// LargeArtifactScanner - finds large version-controlled files
///
/// Works only from the version-control listing. When the listing is
/// unavailable the result is empty; there is deliberately no fallback to
/// a filesystem walk, which would count scanner downloads and build output.
pub struct LargeArtifactScanner<'a> {
    lister: &'a dyn TrackedFileLister,
    exclusion: &'a ArtifactExclusion,
}

impl<'a> LargeArtifactScanner<'a> {
    pub fn new(lister: &'a dyn TrackedFileLister, exclusion: &'a ArtifactExclusion) -> Self {
        Self { lister, exclusion }
    }

    /// Runs the scan and wraps it as a `large_artifacts` fragment.
    ///
    /// An unavailable listing yields `not_found`, so the domain is reported
    /// absent instead of as a verified zero.
    pub fn scan_fragment(&self, repository_root: &Path, min_size_bytes: u64) -> MetricFragment {
        let origin = Some(PathBuf::from(TRACKED_FILES_ORIGIN));
        match self.scan(repository_root, min_size_bytes) {
            Ok(records) => {
                let total_bytes: u64 = records.iter().map(|r| r.size_bytes).sum();
                MetricFragment::ok(
                    MetricDomain::LargeArtifacts,
                    origin,
                    [
                        ("count", FieldValue::Count(records.len() as u64)),
                        ("total_bytes", FieldValue::Count(total_bytes)),
                    ],
                )
                .with_detail(FragmentDetail::LargeArtifacts(records))
            }
            Err(e) => {
                tracing::warn!(
                    "Tracked-file listing unavailable for {}: {}",
                    repository_root.display(),
                    e
                );
                MetricFragment::not_found(MetricDomain::LargeArtifacts, origin)
            }
        }
    }

    /// Tracked, non-excluded files of at least `min_size_bytes`, largest first.
    ///
    /// # Errors
    /// Returns the lister's error when the version-control listing is
    /// unavailable; callers report that as no records.
    pub fn scan(
        &self,
        repository_root: &Path,
        min_size_bytes: u64,
    ) -> Result<Vec<LargeArtifactRecord>> {
        let tracked = self.lister.list_tracked_files(repository_root)?;

        let mut records: Vec<LargeArtifactRecord> = tracked
            .into_iter()
            .filter(|file| file.size_bytes >= min_size_bytes)
            .filter(|file| !self.exclusion.is_excluded(&file.relative_path))
            .map(|file| LargeArtifactRecord::new(file.relative_path, file.size_bytes))
            .collect();

        records.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });

        for pattern in self.exclusion.unmatched_custom_patterns() {
            tracing::debug!(pattern = %pattern, "Exclusion pattern matched no large tracked file");
        }

        Ok(records)
    }
}
