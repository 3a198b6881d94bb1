//! emx-teamcity CLI
//!
//! Replay a BDD runner event log as TeamCity service messages on stdout.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "EMX_TEAMCITY_LOG";

#[derive(Parser, Debug)]
#[command(name = "emx-teamcity")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Translate a BDD runner event log into TeamCity service messages")]
struct Cli {
    /// Event log (newline-delimited JSON); reads stdin when absent or `-`
    path: Option<PathBuf>,

    /// Abort on the first malformed event line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            tracing::info!("{}", summary.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; stdout carries the service messages.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<emx_teamcity::ReplaySummary> {
    // Stdout is line-buffered, so each message reaches the CI server as soon
    // as it is written.
    let stdout = io::stdout();
    let builder = emx_teamcity::reporter(stdout.lock()).strict(cli.strict);

    match cli.path.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open event log {}", path.display()))?;
            let summary = builder
                .source_name(path.display().to_string())
                .replay(BufReader::new(file))?;
            Ok(summary)
        }
        _ => {
            let stdin = io::stdin();
            let summary = builder
                .source_name("<stdin>")
                .replay(stdin.lock())?;
            Ok(summary)
        }
    }
}
