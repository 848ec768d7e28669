//! Configuration for pipeline-metrics.
//!
//! Two layers feed the engine: command-line flags (each backed by an
//! environment variable) and an optional `pipeline-metrics.config.yml`.
//! [`EngineConfig::resolve`] merges them, flags first, into the single
//! struct the use cases are built from.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::dto::CollectRequest;
use crate::metrics_aggregation::domain::{RepositoryIdentity, RunIdentity};
use crate::metrics_aggregation::services::{SearchRoots, DEFAULT_MIN_SIZE_BYTES};
use crate::shared::error::MetricsError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "pipeline-metrics.config.yml";

const DEFAULT_SCRATCH_DIR: &str = "/tmp";
const DEFAULT_RESULTS_DIR: &str = "/tmp/scan-results";
/// Checkout directory used by the scan workflow when it clones the target repository
const EXTERNAL_REPOSITORY_DIR: &str = "external-repo";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub scratch_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub repository_root: Option<PathBuf>,
    pub large_file_threshold_bytes: Option<u64>,
    pub exclude_patterns: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.large_file_threshold_bytes == Some(0) {
        return Err(MetricsError::InvalidConfiguration {
            field: "large_file_threshold_bytes".to_string(),
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    if let Some(ref patterns) = config.exclude_patterns {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                return Err(MetricsError::InvalidConfiguration {
                    field: format!("exclude_patterns[{}]", i),
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
    }
}

/// Values supplied on the command line or through the environment.
///
/// Empty strings count as unset, since CI systems often export empty
/// variables for secrets that are not configured.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repository: String,
    pub collector_url: Option<String>,
    pub sonar_url: Option<String>,
    pub sonar_token: Option<String>,
    pub run_id: Option<String>,
    pub run_number: Option<u64>,
    pub scratch_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub repository_root: Option<PathBuf>,
    pub min_size: Option<u64>,
    pub exclude: Vec<String>,
}

/// Static-analysis service endpoint and its token
#[derive(Clone, PartialEq, Eq)]
pub struct StaticAnalysisEndpoint {
    pub url: String,
    pub token: String,
}

impl std::fmt::Debug for StaticAnalysisEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticAnalysisEndpoint")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Fully resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub repository: RepositoryIdentity,
    pub run: RunIdentity,
    /// `None` means the run is a dry run
    pub collector_url: Option<String>,
    pub static_analysis: Option<StaticAnalysisEndpoint>,
    pub search_roots: SearchRoots,
    pub repository_root: PathBuf,
    pub large_file_threshold_bytes: u64,
    pub exclude_patterns: Vec<String>,
}

impl EngineConfig {
    /// Merges flags/environment over the config file over built-in defaults
    ///
    /// # Arguments
    /// * `overrides` - Flag and environment values
    /// * `file` - Parsed config file, if one was found
    /// * `working_dir` - Directory the pipeline runs in; the last artifact
    ///   search root and the base for the default repository root
    ///
    /// # Errors
    /// Returns `MetricsError::InvalidConfiguration` for an invalid
    /// repository name or a zero large-file threshold.
    pub fn resolve(
        overrides: Overrides,
        file: Option<ConfigFile>,
        working_dir: &Path,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();

        let repository = RepositoryIdentity::new(overrides.repository)?;

        let run = RunIdentity {
            run_id: non_empty(overrides.run_id).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            run_number: overrides.run_number,
        };

        let sonar = (non_empty(overrides.sonar_url), non_empty(overrides.sonar_token));
        let static_analysis = match sonar {
            (Some(url), Some(token)) => Some(StaticAnalysisEndpoint { url, token }),
            (Some(_), None) => {
                tracing::warn!(
                    "Static-analysis URL set without a token; the service will not be queried"
                );
                None
            }
            _ => None,
        };

        let search_roots = SearchRoots::new(
            overrides
                .scratch_dir
                .or(file.scratch_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR)),
            overrides
                .results_dir
                .or(file.results_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR)),
            working_dir,
        );

        let repository_root = overrides
            .repository_root
            .or(file.repository_root)
            .unwrap_or_else(|| default_repository_root(working_dir));

        let large_file_threshold_bytes = overrides
            .min_size
            .or(file.large_file_threshold_bytes)
            .unwrap_or(DEFAULT_MIN_SIZE_BYTES);
        if large_file_threshold_bytes == 0 {
            return Err(MetricsError::InvalidConfiguration {
                field: "min_size".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        let mut exclude_patterns = file.exclude_patterns.unwrap_or_default();
        exclude_patterns.extend(overrides.exclude);

        Ok(Self {
            repository,
            run,
            collector_url: non_empty(overrides.collector_url),
            static_analysis,
            search_roots,
            repository_root,
            large_file_threshold_bytes,
            exclude_patterns,
        })
    }

    pub fn collect_request(&self) -> CollectRequest {
        CollectRequest::builder(self.repository.clone(), self.run.clone())
            .search_roots(self.search_roots.clone())
            .repository_root(self.repository_root.clone())
            .large_file_threshold_bytes(self.large_file_threshold_bytes)
            .exclude_patterns(self.exclude_patterns.clone())
            .build()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_repository_root(working_dir: &Path) -> PathBuf {
    let external = working_dir.join(EXTERNAL_REPOSITORY_DIR);
    if external.is_dir() {
        external
    } else {
        working_dir.to_path_buf()
    }
}
