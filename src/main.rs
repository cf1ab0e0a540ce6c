// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, controlled by -v or RUST_LOG)
// 3. Run the check and print the report
// 4. Exit with proper code (0 = finished, 1 = could not start)
//
// Broken links do NOT change the exit code: finding them is a normal result.
// =============================================================================

mod checker; // src/checker/ - per-link building blocks
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - runtime settings
mod crawl; // src/crawl/ - website crawling logic
mod error; // src/error.rs - error types
mod report; // src/report.rs - stdout output

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CheckConfig;
use report::{Reporter, SummaryFormat};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "CLI arguments parsed");

    // No URL: show help and exit successfully
    let Some(url) = cli.url.as_deref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let format = if cli.json {
        SummaryFormat::Json
    } else {
        SummaryFormat::Text
    };
    let reporter = Reporter::stdout(format);

    crawl::check(url, CheckConfig::from(&cli), &reporter).await?;
    Ok(())
}

// Priority: RUST_LOG env var > -v flags > default (warn)
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
