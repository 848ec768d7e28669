use crate::ports::outbound::{TrackedFile, TrackedFileLister};
use crate::shared::security::validate_directory;
use crate::shared::Result;
use std::fs;
use std::path::Path;
use std::process::Command;

/// GitTrackedFileLister adapter listing files from the git index
///
/// Runs `git ls-files -z` in the repository root and stats each entry
/// without following symlinks. Entries deleted from the working tree are
/// skipped; symlinks report their own size, not their target's.
pub struct GitTrackedFileLister;

impl GitTrackedFileLister {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitTrackedFileLister {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackedFileLister for GitTrackedFileLister {
    fn list_tracked_files(&self, repository_root: &Path) -> Result<Vec<TrackedFile>> {
        validate_directory(repository_root)?;

        let output = Command::new("git")
            .args(["ls-files", "-z"])
            .current_dir(repository_root)
            .output()
            .map_err(|e| anyhow::anyhow!("failed to run git: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git ls-files failed: {}", stderr.trim());
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        let files = listing
            .split('\0')
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let metadata = fs::symlink_metadata(repository_root.join(entry)).ok()?;
                Some(TrackedFile::new(entry, metadata.len()))
            })
            .collect();

        Ok(files)
    }
}
