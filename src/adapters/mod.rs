/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// disk, git, the static-analysis service, the metrics collector and the
/// console.
pub mod outbound;
