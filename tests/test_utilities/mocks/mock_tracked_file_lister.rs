use pipeline_metrics::prelude::*;
use std::path::Path;

/// Mock TrackedFileLister returning a fixed listing
#[derive(Default, Clone)]
pub struct MockTrackedFileLister {
    files: Vec<TrackedFile>,
    should_fail: bool,
}

impl MockTrackedFileLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, relative_path: &str, size_bytes: u64) -> Self {
        self.files.push(TrackedFile::new(relative_path, size_bytes));
        self
    }

    /// Behaves like a directory that is not a git checkout
    pub fn with_failure() -> Self {
        Self {
            files: Vec::new(),
            should_fail: true,
        }
    }
}

impl TrackedFileLister for MockTrackedFileLister {
    fn list_tracked_files(&self, _repository_root: &Path) -> Result<Vec<TrackedFile>> {
        if self.should_fail {
            anyhow::bail!("fatal: not a git repository (or any of the parent directories): .git");
        }
        Ok(self.files.clone())
    }
}
