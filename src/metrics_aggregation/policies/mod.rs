mod artifact_exclusion;
mod source_priority;

pub use artifact_exclusion::{ArtifactExclusion, DEFAULT_TOOL_ARTIFACT_PATTERNS};
pub use source_priority::SourcePriority;
