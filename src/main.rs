mod cli;

use cli::Args;
use owo_colors::OwoColorize;
use pipeline_metrics::adapters::outbound::console::StderrProgressReporter;
use pipeline_metrics::adapters::outbound::filesystem::{CachingArtifactReader, FileSystemReader};
use pipeline_metrics::adapters::outbound::network::{PushgatewayClient, SonarQubeClient};
use pipeline_metrics::adapters::outbound::vcs::GitTrackedFileLister;
use pipeline_metrics::application::dto::{CollectResponse, EmitReport, StaticAnalysisStatus};
use pipeline_metrics::application::use_cases::{CollectMetricsUseCase, PushMetricsUseCase};
use pipeline_metrics::config::{discover_config, load_config_from_path, EngineConfig};
use pipeline_metrics::ports::outbound::ProgressReporter;
use pipeline_metrics::shared::error::{ExitCode, MetricsError};
use pipeline_metrics::shared::Result;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(exit_code_for(&e).as_i32());
        }
    }
}

/// Logs go to stderr so stdout carries only the dry-run payload.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<MetricsError>() {
        Some(MetricsError::InvalidConfiguration { .. }) => ExitCode::InvalidArguments,
        _ => ExitCode::ApplicationError,
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let working_dir = PathBuf::from(".");

    // Load configuration: flags and environment over the config file
    let file_config = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&working_dir)?,
    };
    let config = EngineConfig::resolve(args.overrides(), file_config, &working_dir)?;

    // Create adapters (Dependency Injection)
    let artifact_reader = CachingArtifactReader::new(FileSystemReader::new());
    let tracked_file_lister = GitTrackedFileLister::new();
    let static_analysis = config
        .static_analysis
        .as_ref()
        .map(|endpoint| SonarQubeClient::new(&endpoint.url, endpoint.token.clone()))
        .transpose()?;

    let collect = CollectMetricsUseCase::new(
        artifact_reader,
        tracked_file_lister,
        static_analysis,
        StderrProgressReporter::new(),
    );
    let response = collect.execute(config.collect_request()).await?;

    // Without a collector URL the run is a dry run
    let collector_url = match config.collector_url.as_deref() {
        Some(url) if !args.dry_run => url,
        _ => {
            print!("{}", response.payload.render());
            print_summary(&response, None);
            return Ok(ExitCode::Success);
        }
    };
    let progress_reporter = StderrProgressReporter::new();
    let push = PushMetricsUseCase::new(
        PushgatewayClient::new(collector_url)?,
        StderrProgressReporter::new(),
    );

    match push.execute(&config.repository, &response.payload).await {
        Ok(report) => {
            print_summary(&response, Some(&report));
            Ok(ExitCode::Success)
        }
        Err(e) => {
            progress_reporter.report_error(&format!("⚠️  Push failed: {:#}", e));
            let report = EmitReport {
                attempted_lines: response.payload.len(),
                accepted_lines: 0,
                stale_cleared: false,
            };
            print_summary(&response, Some(&report));
            Ok(ExitCode::Degraded)
        }
    }
}

fn print_summary(response: &CollectResponse, emit: Option<&EmitReport>) {
    let snapshot = &response.snapshot;

    eprintln!();
    eprintln!("{}", "📊 Pipeline metrics summary".bold());
    eprintln!("   Repository:       {}", snapshot.repository());
    eprintln!("   Run:              {}", snapshot.run().run_id);
    eprintln!(
        "   Domains present:  {}/{}",
        response.domains_present(),
        snapshot.domains().len()
    );
    eprintln!("   Fields collected: {}", response.fields_collected());
    for (domain, origin) in snapshot.origins() {
        eprintln!("     {:<18} {}", domain.as_str(), origin.display());
    }

    let score = format!("{:.2}", response.quality_score());
    if response.quality_score() >= 80.0 {
        eprintln!("   Quality score:    {}", score.green());
    } else if response.quality_score() >= 50.0 {
        eprintln!("   Quality score:    {}", score.yellow());
    } else {
        eprintln!("   Quality score:    {}", score.red());
    }

    match response.static_analysis {
        StaticAnalysisStatus::Fetched => eprintln!("   Static analysis:  fetched"),
        StaticAnalysisStatus::Skipped => eprintln!("   Static analysis:  not configured"),
        StaticAnalysisStatus::Failed(kind) => {
            eprintln!("   Static analysis:  {}", kind.to_string().yellow())
        }
    }

    match emit {
        None => eprintln!(
            "   Push:             skipped (dry run, {} line(s))",
            response.payload.len()
        ),
        Some(report) if report.is_complete() => eprintln!(
            "   Push:             {}",
            format!("{}/{} line(s) accepted", report.accepted_lines, report.attempted_lines).green()
        ),
        Some(report) => eprintln!(
            "   Push:             {}",
            format!("{}/{} line(s) accepted", report.accepted_lines, report.attempted_lines).red()
        ),
    }
}
