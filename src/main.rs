//! Review-Harvest main entry point
//!
//! This is the command-line interface for the App Store review collector.

use anyhow::Context;
use clap::Parser;
use review_harvest::config::{load_config, Config};
use review_harvest::crawler::crawl;
use review_harvest::prompt::{capitalize, prompt_stdin};
use review_harvest::CrawlOutcome;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Review-Harvest: collects App Store customer reviews into a CSV file
///
/// Pass `--app-id` and `--app-url` to crawl a specific app, or run without
/// them to pick an app from the catalog interactively.
#[derive(Parser, Debug)]
#[command(name = "review-harvest")]
#[command(version)]
#[command(about = "Collects App Store customer reviews into a CSV file", long_about = None)]
struct Cli {
    /// App Store id to crawl reviews for
    #[arg(long, requires = "app_url")]
    app_id: Option<u64>,

    /// Store page URL shown after crawling
    #[arg(long, requires = "app_id")]
    app_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    let (app_id, app_url) = match (cli.app_id, cli.app_url) {
        (Some(id), Some(url)) => (id, url),
        _ => match prompt_stdin(&config.apps) {
            Ok(app) => {
                println!("Crawling {} reviews.", capitalize(&app.name));
                (app.id, app.url.clone())
            }
            Err(e) => {
                eprintln!("Invalid input. {}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    handle_crawl(&config, app_id).await?;
    println!("App's url-> {}", app_url);

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_harvest=info,warn"),
            1 => EnvFilter::new("review_harvest=debug,info"),
            2 => EnvFilter::new("review_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, app_id: u64) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl for app {} (delay {}ms between requests)",
        app_id,
        config.crawler.request_delay_ms
    );

    let outcome = crawl(config, app_id)
        .await
        .with_context(|| format!("Crawl failed for app {}", app_id))?;

    match outcome {
        CrawlOutcome::Written { path, result } => {
            tracing::info!(
                "Crawl completed: {} reviews, {} skipped pages, {} skipped entries -> {}",
                result.len(),
                result.skipped_pages.len(),
                result.skipped_entries,
                path.display()
            );
        }
        CrawlOutcome::NoReviews { reason } => {
            tracing::info!("No output written for app {}: {}", app_id, reason);
        }
    }

    Ok(())
}
