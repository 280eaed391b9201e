//! Mnamky main entry point
//!
//! This is the command-line interface for the Mnamky blog crawler.

use clap::Parser;
use mnamky::config::{load_config_with_hash, validate, Config};
use mnamky::crawler::{build_http_client, crawl, PageList};
use mnamky::entry::SelectorTemplate;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mnamky: a paginated blog listing crawler
///
/// Mnamky visits every listing page of a blog catalogue, extracts the title,
/// link, summary and image of each entry, and writes them to a CSV file
/// ordered by the sequence number in their titles.
#[derive(Parser, Debug)]
#[command(name = "mnamky")]
#[command(version = "1.0.0")]
#[command(about = "Exports a paginated blog listing as CSV", long_about = None)]
struct Cli {
    /// Listing URL to crawl (overrides the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Last listing page to visit (default: all pages)
    #[arg(short, long, value_name = "N")]
    until_page: Option<u32>,

    /// CSV output path (default: out/mnamky.csv)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover the listing pages and print their URLs without crawling them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config).await?;
    } else {
        handle_crawl(&config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mnamky=info,warn"),
            1 => EnvFilter::new("mnamky=debug,info"),
            2 => EnvFilter::new("mnamky=trace,debug"),
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

/// Layers command-line values over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.target.base_url = Some(url.clone());
    }
    if let Some(until_page) = cli.until_page {
        config.target.until_page = Some(until_page);
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
}

/// Handles the --dry-run mode: discovers pagination and lists page URLs
async fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = config.base_url()?;
    let client = build_http_client(&config.http)?;
    let template = SelectorTemplate::from_config(&config.template)?;

    let page_list =
        PageList::discover(&client, &template, base_url, config.target.until_page).await?;

    println!("=== Mnamky Dry Run ===\n");
    println!("Base URL: {}", page_list.base_url());
    println!("Listing pages: {}", page_list.last_page());
    println!("Pages to visit: {}", page_list.until_page());
    println!("Output: {}", config.output.csv_path);
    println!();

    for url in page_list.page_urls() {
        println!("  * {}", url);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl of {}", config.base_url()?);

    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                mnamky::output::print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
