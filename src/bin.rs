//! Binary entry point for `issue-analyzer`.
//!
//! This module provides the command-line interface for issue-analyzer with options
//! for configuration file paths, logging verbosity, and local test runs. It
//! initializes logging and runs the analyzer once.

use clap::{CommandFactory, Parser, error::ErrorKind};
use issue_analyzer::base::{
    config::Config,
    types::{RepoRef, RunMode, Void},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Issue-analyzer – asks for a minimal reproducible example on bug reports that lack one.
///
/// Configuration comes from environment variables (`GITHUB_TOKEN`, `ANTHROPIC_API_KEY`, and
/// the variables GitHub Actions sets) or an optional `config.toml`. With no arguments, the
/// analyzer handles the issue event that triggered the workflow.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the analyzer will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans to an OTLP collector (configured via the standard `OTEL_EXPORTER_OTLP_*` variables).
    #[arg(long)]
    otlp: bool,
    /// Run in local test mode: analyze an existing issue and print the results without posting.
    #[arg(long)]
    test: bool,
    /// Repository (`owner/repo`) for test mode.
    #[arg(long, requires = "test")]
    repo: Option<RepoRef>,
    /// Issue number for test mode.
    #[arg(long, requires = "test")]
    issue: Option<u64>,
}

impl Args {
    /// Resolve the run mode, exiting with a usage error when test mode lacks its arguments.
    fn mode(&self) -> RunMode {
        match (self.test, &self.repo, self.issue) {
            (false, _, _) => RunMode::Workflow,
            (true, Some(repo), Some(issue)) => RunMode::LocalTest { repo: repo.clone(), issue },
            (true, _, _) => Args::command().error(ErrorKind::MissingRequiredArgument, "Test mode requires both --repo and --issue arguments").exit(),
        }
    }
}

/// Main entry point for the issue-analyzer binary.
///
/// Sets up logging based on verbosity, loads configuration, and runs the analyzer.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();
    let mode = args.mode();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("issue-analyzer");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref())?;

    issue_analyzer::start(config, mode).await
}
