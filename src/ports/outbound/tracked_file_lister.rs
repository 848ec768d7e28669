use crate::shared::Result;
use std::path::Path;

/// A file tracked by version control, with its size on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Path relative to the repository root, '/'-separated
    pub relative_path: String,
    pub size_bytes: u64,
}

impl TrackedFile {
    pub fn new(relative_path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size_bytes,
        }
    }
}

/// TrackedFileLister port for enumerating version-controlled files
///
/// Only tracked paths are ever listed; untracked build or scratch output
/// in the working tree must not appear.
pub trait TrackedFileLister: Send + Sync {
    /// Lists every tracked file under `repository_root`
    ///
    /// Files that are tracked but missing from the working tree are skipped.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `repository_root` is not a version-controlled checkout
    /// - The version-control tool is not installed or fails
    fn list_tracked_files(&self, repository_root: &Path) -> Result<Vec<TrackedFile>>;
}
