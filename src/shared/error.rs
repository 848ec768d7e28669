use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI steps branch on these: a degraded run still produced a snapshot,
/// but the collector did not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Snapshot computed and (when a collector is configured) accepted
    Success = 0,
    /// Snapshot computed, push to the collector failed
    Degraded = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, I/O outside the per-domain boundary, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::Degraded => write!(f, "Degraded (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// The four ways a collection step can fail.
///
/// Every error raised inside the engine classifies itself into exactly one
/// of these, which decides how loudly it is logged and whether it may
/// fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No candidate artifact exists. Expected; never logged as an error.
    SourceAbsent,
    /// An artifact exists but could not be parsed; the domain falls through.
    ParseMalformed,
    /// A remote endpoint could not be reached or answered non-2xx.
    NetworkUnavailable,
    /// A remote endpoint rejected the supplied credentials.
    AuthFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::SourceAbsent => "source_absent",
            FailureKind::ParseMalformed => "parse_malformed",
            FailureKind::NetworkUnavailable => "network_unavailable",
            FailureKind::AuthFailure => "auth_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-specific errors for metrics collection and emission.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("No source artifact found for domain '{domain}'")]
    SourceAbsent { domain: String },

    #[error("Failed to parse artifact: {path}\nDetails: {details}\n\n💡 Hint: The file was skipped; the next candidate source is tried")]
    ParseMalformed { path: PathBuf, details: String },

    #[error("Endpoint unavailable: {endpoint}\nDetails: {details}\n\n💡 Hint: Check that the service is reachable from this runner")]
    NetworkUnavailable { endpoint: String, details: String },

    #[error("Authentication rejected by {service} (HTTP {status})\n\n💡 Hint: Verify the token and its permissions")]
    AuthFailure { service: String, status: u16 },

    #[error("Collector rejected the payload: {endpoint} (HTTP {status})\n\n💡 Hint: Re-run the pipeline once the collector is healthy; the snapshot is replaced, not appended")]
    CollectorRejected { endpoint: String, status: u16 },

    #[error("Invalid configuration: {field}\nReason: {reason}\n\n💡 Hint: Check the CLI flags, environment variables and config file")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },
}

impl MetricsError {
    /// Classifies this error into the engine's failure taxonomy.
    ///
    /// Configuration and read errors have no network component and are
    /// treated as malformed input.
    pub fn kind(&self) -> FailureKind {
        match self {
            MetricsError::SourceAbsent { .. } => FailureKind::SourceAbsent,
            MetricsError::ParseMalformed { .. }
            | MetricsError::InvalidConfiguration { .. }
            | MetricsError::FileReadError { .. } => FailureKind::ParseMalformed,
            MetricsError::NetworkUnavailable { .. } => FailureKind::NetworkUnavailable,
            MetricsError::AuthFailure { .. } => FailureKind::AuthFailure,
            MetricsError::CollectorRejected { status, .. } => {
                if is_auth_status(*status) {
                    FailureKind::AuthFailure
                } else {
                    FailureKind::NetworkUnavailable
                }
            }
        }
    }
}

/// Returns true for HTTP statuses that mean "credentials rejected".
pub fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

/// Classifies an arbitrary error chain, defaulting to network failure for
/// errors that did not originate in this crate.
pub fn classify(error: &anyhow::Error) -> FailureKind {
    error
        .downcast_ref::<MetricsError>()
        .map(MetricsError::kind)
        .unwrap_or(FailureKind::NetworkUnavailable)
}
