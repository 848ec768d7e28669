use pipeline_metrics::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock ArtifactReader serving artifacts from memory
#[derive(Default, Clone)]
pub struct MockArtifactReader {
    files: HashMap<PathBuf, String>,
    unreadable: HashSet<PathBuf>,
    reads: Arc<AtomicUsize>,
}

impl MockArtifactReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }

    /// The path exists but every read fails (e.g. permissions changed mid-run)
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(PathBuf::from(path));
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ArtifactReader for MockArtifactReader {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.unreadable.contains(path)
    }

    fn read_artifact(&self, path: &Path) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unreadable.contains(path) {
            anyhow::bail!("Permission denied: {}", path.display());
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No such file: {}", path.display()))
    }
}
