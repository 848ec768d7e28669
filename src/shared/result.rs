/// Type alias for Result with anyhow::Error as the error type.
/// Adapters and the binary use it; domain services return typed values instead.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
