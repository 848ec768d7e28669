use crate::metrics_aggregation::domain::{RepositoryIdentity, RunIdentity};
use crate::metrics_aggregation::services::{SearchRoots, DEFAULT_MIN_SIZE_BYTES};
use std::path::PathBuf;

/// CollectRequest - everything one collection pass needs
///
/// Built once by the binary from flags, environment and the optional config
/// file; the engine itself never reads the environment.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    /// Stable key for the snapshot (also the static-analysis project key)
    pub repository: RepositoryIdentity,
    pub run: RunIdentity,
    /// Directories searched for scan artifacts
    pub search_roots: SearchRoots,
    /// Checkout whose tracked files are scanned for large artifacts
    pub repository_root: PathBuf,
    pub large_file_threshold_bytes: u64,
    /// Tool-artifact patterns in addition to the built-in ones
    pub exclude_patterns: Vec<String>,
}

impl CollectRequest {
    pub fn builder(repository: RepositoryIdentity, run: RunIdentity) -> CollectRequestBuilder {
        CollectRequestBuilder::new(repository, run)
    }
}

/// Builder for CollectRequest with engine defaults for optional fields
#[derive(Debug, Clone)]
pub struct CollectRequestBuilder {
    repository: RepositoryIdentity,
    run: RunIdentity,
    search_roots: SearchRoots,
    repository_root: PathBuf,
    large_file_threshold_bytes: u64,
    exclude_patterns: Vec<String>,
}

impl CollectRequestBuilder {
    fn new(repository: RepositoryIdentity, run: RunIdentity) -> Self {
        Self {
            repository,
            run,
            search_roots: SearchRoots::default(),
            repository_root: PathBuf::from("."),
            large_file_threshold_bytes: DEFAULT_MIN_SIZE_BYTES,
            exclude_patterns: Vec::new(),
        }
    }

    pub fn search_roots(mut self, search_roots: SearchRoots) -> Self {
        self.search_roots = search_roots;
        self
    }

    pub fn repository_root(mut self, repository_root: impl Into<PathBuf>) -> Self {
        self.repository_root = repository_root.into();
        self
    }

    pub fn large_file_threshold_bytes(mut self, threshold: u64) -> Self {
        self.large_file_threshold_bytes = threshold;
        self
    }

    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn build(self) -> CollectRequest {
        CollectRequest {
            repository: self.repository,
            run: self.run,
            search_roots: self.search_roots,
            repository_root: self.repository_root,
            large_file_threshold_bytes: self.large_file_threshold_bytes,
            exclude_patterns: self.exclude_patterns,
        }
    }
}
