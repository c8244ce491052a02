//! Seatview main entry point
//!
//! This is the command-line interface for the Seatview photo harvester.

use anyhow::Context;
use clap::Parser;
use seatview::config::{load_config_with_hash, resolve_venue_name, validate, Config};
use seatview::crawler::run_scrape;
use seatview::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seatview: a venue seat-view photo harvester
///
/// Seatview discovers every section of a venue on the photo-sharing site,
/// collects the seat-view photos of each section, downloads them into a
/// section/row tree and writes the metadata as JSON.
#[derive(Parser, Debug)]
#[command(name = "seatview")]
#[command(version = "1.0.0")]
#[command(about = "A venue seat-view photo harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Venue name or alias, e.g. "msg" or "Citi Field"
    #[arg(long)]
    venue: Option<String>,

    /// Output directory for images and metadata
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Only scrape the first N sections
    #[arg(long, value_name = "N")]
    max_sections: Option<usize>,

    /// Collect metadata without downloading images
    #[arg(long)]
    no_download: bool,

    /// Visit each photo page for event and contributor details
    #[arg(long)]
    details: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seatview=info,warn"),
            1 => EnvFilter::new("seatview=debug,info"),
            2 => EnvFilter::new("seatview=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(venue) = &cli.venue {
        config.site.venue = resolve_venue_name(venue);
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if cli.max_sections.is_some() {
        config.scrape.max_sections = cli.max_sections;
    }
    if cli.no_download {
        config.download.enabled = false;
    }
    if cli.details {
        config.scrape.fetch_details = true;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) {
    println!("=== Seatview Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Venue: {}", config.site.venue.replace('+', " "));

    println!("\nFetcher:");
    println!(
        "  Delay: {}-{}ms",
        config.fetcher.min_delay_ms, config.fetcher.max_delay_ms
    );
    println!("  Max retries: {}", config.fetcher.max_retries);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nScrape:");
    match config.scrape.max_sections {
        Some(limit) => println!("  Sections: first {}", limit),
        None => println!("  Sections: all"),
    }
    println!("  Max pages per section: {}", config.scrape.max_pages);
    println!(
        "  Concurrent sections: {}",
        config.scrape.max_concurrent_sections
    );
    println!("  Photo details: {}", config.scrape.fetch_details);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Metadata: {}", config.output.metadata_path().display());
    println!("  Summary: {}", config.output.summary_path().display());
    if config.download.enabled {
        println!(
            "  Downloads: up to {} at once",
            config.download.max_concurrent
        );
    } else {
        println!("  Downloads: disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    match run_scrape(config).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
