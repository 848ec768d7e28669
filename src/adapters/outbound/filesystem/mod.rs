/// Filesystem adapters for reading scan artifacts
mod caching_reader;
mod file_reader;

pub use caching_reader::CachingArtifactReader;
pub use file_reader::FileSystemReader;
