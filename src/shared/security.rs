use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest scan artifact the engine will read (64 MB).
/// Scanner reports beyond this are treated as unreadable rather than loaded.
pub const MAX_ARTIFACT_SIZE: u64 = 64 * 1024 * 1024;

/// Checks that `path` is a regular, non-symlink file within the size limit.
///
/// Uses `symlink_metadata()` so a link planted in a shared scratch
/// directory is rejected instead of followed.
///
/// # Returns
/// The file size in bytes
///
/// # Errors
/// Returns an error if the path is missing, a symlink, not a regular file,
/// or larger than `max_size`
pub fn validate_artifact(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read metadata for {}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Scan artifacts must be regular files.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, max_size)?;
    Ok(metadata.len())
}

/// Validates file size is within acceptable limits
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates that `path` is an existing directory reached without a symlink.
pub fn validate_directory(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_dir() {
        anyhow::bail!("{} is not a directory", path.display());
    }

    Ok(())
}
