/// Metrics aggregation domain layer
///
/// Pure types, merge policies and services. Nothing in here touches the
/// environment, the network or the filesystem directly; I/O arrives through
/// the ports in `crate::ports`.
pub mod domain;
pub mod policies;
pub mod services;
