use crate::shared::Result;
use std::path::Path;

/// ArtifactReader port for reading scan-result artifacts
///
/// Abstracts the filesystem so locating and parsing can be exercised
/// without real files. Implementations are shared across the per-domain
/// parse tasks and must be `Send + Sync`.
pub trait ArtifactReader: Send + Sync {
    /// Returns true if `path` exists and is a readable regular file.
    ///
    /// Does not validate content.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the artifact at `path` as UTF-8 text
    ///
    /// # Arguments
    /// * `path` - Path returned by the source locator
    ///
    /// # Returns
    /// The raw artifact content
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file no longer exists or is not a regular file
    /// - The file is a symbolic link or exceeds the size limit
    /// - The file cannot be read or is not valid UTF-8
    fn read_artifact(&self, path: &Path) -> Result<String>;
}
