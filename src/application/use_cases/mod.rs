/// Use cases module containing application business logic orchestration
mod collect_metrics;
mod push_metrics;

pub use collect_metrics::CollectMetricsUseCase;
pub use push_metrics::PushMetricsUseCase;
