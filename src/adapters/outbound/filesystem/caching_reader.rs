use crate::ports::outbound::ArtifactReader;
use crate::shared::Result;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CachingArtifactReader wraps an ArtifactReader and memoises successful reads.
///
/// Several domains share artifacts (`test-results.json` feeds coverage,
/// unit tests and performance tests), and those domains are parsed on
/// separate blocking tasks. The cache is concurrent so each file is read
/// once per run. Failed reads are not cached.
pub struct CachingArtifactReader<R: ArtifactReader> {
    inner: R,
    cache: Arc<DashMap<PathBuf, Arc<str>>>,
}

impl<R: ArtifactReader> CachingArtifactReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl<R: ArtifactReader> ArtifactReader for CachingArtifactReader<R> {
    fn exists(&self, path: &Path) -> bool {
        self.cache.contains_key(path) || self.inner.exists(path)
    }

    fn read_artifact(&self, path: &Path) -> Result<String> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(cached.to_string());
        }

        let content = self.inner.read_artifact(path)?;
        self.cache
            .insert(path.to_path_buf(), Arc::from(content.as_str()));

        Ok(content)
    }
}
