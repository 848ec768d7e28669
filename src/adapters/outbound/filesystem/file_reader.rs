use crate::ports::outbound::ArtifactReader;
use crate::shared::error::MetricsError;
use crate::shared::security::{validate_artifact, MAX_ARTIFACT_SIZE};
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// FileSystemReader adapter for reading scan artifacts from disk
///
/// Every read goes through `validate_artifact`: symbolic links, non-regular
/// files and files above the size limit are refused before any byte is read.
#[derive(Debug, Default)]
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactReader for FileSystemReader {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    fn read_artifact(&self, path: &Path) -> Result<String> {
        validate_artifact(path, MAX_ARTIFACT_SIZE)?;

        fs::read_to_string(path).map_err(|e| {
            MetricsError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_artifact_success() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trivy-results.json");
        fs::write(&path, r#"{"Results": []}"#).unwrap();

        let reader = FileSystemReader::new();
        assert!(reader.exists(&path));
        assert_eq!(reader.read_artifact(&path).unwrap(), r#"{"Results": []}"#);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coverage.xml");

        let reader = FileSystemReader::new();
        assert!(!reader.exists(&path));
        assert!(reader.read_artifact(&path).is_err());
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let reader = FileSystemReader::new();
        assert!(!reader.exists(temp_dir.path()));
        assert!(reader.read_artifact(temp_dir.path()).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quality-results.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let reader = FileSystemReader::new();
        let err = reader.read_artifact(&path).unwrap_err();
        assert!(err.downcast_ref::<MetricsError>().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.json");
        let link = temp_dir.path().join("test-results.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let reader = FileSystemReader::new();
        assert!(!reader.exists(&link));
        assert!(reader.read_artifact(&link).is_err());
    }
}
