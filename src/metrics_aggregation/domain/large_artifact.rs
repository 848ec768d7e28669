/// A version-controlled file at or above the size threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeArtifactRecord {
    pub relative_path: String,
    pub size_bytes: u64,
}

impl LargeArtifactRecord {
    pub fn new(relative_path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size_bytes,
        }
    }
}
