/// Data Transfer Objects for application layer
///
/// DTOs carry requests into the use cases and results back out to the
/// binary, keeping the domain layer isolated.
mod collect_request;
mod collect_response;
mod emit_report;

pub use collect_request::{CollectRequest, CollectRequestBuilder};
pub use collect_response::{CollectResponse, StaticAnalysisStatus};
pub use emit_report::EmitReport;
