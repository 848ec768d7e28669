use clap::Parser;
use std::path::PathBuf;

use pipeline_metrics::config::Overrides;

/// Collect CI scan results, score them, and push the snapshot to a Pushgateway
#[derive(Parser, Debug)]
#[command(name = "pipeline-metrics")]
#[command(version)]
#[command(
    about = "Collect CI scan results, score them, and push the snapshot to a Pushgateway",
    long_about = None
)]
pub struct Args {
    /// Config file (defaults to ./pipeline-metrics.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the exposition payload to stdout instead of pushing it
    #[arg(long)]
    pub dry_run: bool,

    /// Repository identifier; the stable instance key on the collector
    #[arg(short, long, env = "REPO_NAME")]
    pub repository: String,

    /// Pushgateway base URL (without it the run is a dry run)
    #[arg(long, env = "PROMETHEUS_PUSHGATEWAY_URL", value_name = "URL")]
    pub collector_url: Option<String>,

    /// SonarQube base URL
    #[arg(long, env = "SONARQUBE_URL", value_name = "URL")]
    pub sonar_url: Option<String>,

    /// SonarQube token
    #[arg(long, env = "SONARQUBE_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub sonar_token: Option<String>,

    /// CI run identifier (a UUID is generated when absent)
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// CI run number
    #[arg(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: Option<u64>,

    /// Scratch directory searched first for artifacts [default: /tmp]
    #[arg(long, env = "SCAN_SCRATCH_DIR", value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Results directory searched second [default: /tmp/scan-results]
    #[arg(long, env = "SCAN_RESULTS_DIR", value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Checkout scanned for large tracked files [default: ./external-repo if present, else .]
    #[arg(long, env = "SCAN_REPOSITORY_ROOT", value_name = "DIR")]
    pub repository_root: Option<PathBuf>,

    /// Size in bytes from which a tracked file counts as large [default: 1000000]
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Extra tool-artifact patterns to exclude from the large-file scan (supports wildcards: *)
    /// Can be specified multiple times: -e "*.onnx" -e "fixtures"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Flag and environment values handed to config resolution
    pub fn overrides(&self) -> Overrides {
        Overrides {
            repository: self.repository.clone(),
            collector_url: self.collector_url.clone(),
            sonar_url: self.sonar_url.clone(),
            sonar_token: self.sonar_token.clone(),
            run_id: self.run_id.clone(),
            run_number: self.run_number,
            scratch_dir: self.scratch_dir.clone(),
            results_dir: self.results_dir.clone(),
            repository_root: self.repository_root.clone(),
            min_size: self.min_size,
            exclude: self.exclude.clone(),
        }
    }
}
