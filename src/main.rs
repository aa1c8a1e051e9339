use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ieclub_smoke::api::HttpTransport;
use ieclub_smoke::config::{Config, Overrides};
use ieclub_smoke::console::Console;
use ieclub_smoke::runner::{AbortReason, RunReport, SmokeRunner};
use ieclub_smoke::session::TestSession;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code for configuration and setup problems (matches clap's usage errors).
const SETUP_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "ieclub-smoke")]
#[command(about = "Interactive registration-flow smoke test for the IEClub API", long_about = None)]
#[command(version)]
struct Cli {
    /// API root the endpoint paths are appended to
    #[arg(long, env = "IECLUB_API_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds (default: 10)
    #[arg(long, env = "IECLUB_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Config file (default: <config dir>/ieclub-smoke/config.toml, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log requests and stage transitions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ieclub_smoke={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> Result<Result<RunReport, AbortReason>> {
    let transport = HttpTransport::new(config.api_root(), config.timeout())
        .context("Failed to create HTTP client")?;
    let session = TestSession::generate(config);
    info!(base_url = %config.api_root(), email = %session.email, "starting smoke test");

    let mut runner = SmokeRunner::new(transport, io::stdin().lock(), Console::stdout());
    Ok(runner.run(session))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
    };
    let config = match Config::load(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "✗".red().bold());
            return ExitCode::from(SETUP_FAILURE);
        }
    };
    debug!(?config, "resolved configuration");

    match run(&config) {
        Ok(Ok(report)) => {
            debug!(soft_failures = ?report.soft_failures(), "run completed");
            ExitCode::SUCCESS
        }
        Ok(Err(reason)) => {
            debug!(step = %reason.step(), "run aborted");
            ExitCode::from(reason.exit_code())
        }
        Err(e) => {
            eprintln!("{} {e:#}", "✗".red().bold());
            ExitCode::from(SETUP_FAILURE)
        }
    }
}
