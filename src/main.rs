//! Sitegraph main entry point
//!
//! This is the command-line interface for the sitegraph crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sitegraph::config::{load_config_with_hash, validate, Config};
use sitegraph::crawler::Engine;
use sitegraph::output::{print_statistics, write_reports};
use tracing_subscriber::EnvFilter;

/// Sitegraph: a single-site crawler
///
/// Sitegraph crawls one site from a seed URL up to a fixed link depth,
/// staying on the seed's domain, and writes a flat sitemap plus an
/// adjacency-list sitegraph of the pages it visited.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version = "0.1.0")]
#[command(about = "A depth-limited single-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to start crawling from
    #[arg(long)]
    seed: Option<String>,

    /// Maximum link depth from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Delay between requests to the same host, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Maximum number of concurrent fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Crawl without collecting pages (reports will be empty)
    #[arg(long)]
    no_collect: bool,

    /// Path of the sitemap output file
    #[arg(long, value_name = "PATH")]
    sitemap: Option<String>,

    /// Path of the sitegraph output file
    #[arg(long, value_name = "PATH")]
    sitegraph: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(seed) = &self.seed {
            config.crawler.seed_url = seed.clone();
        }
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.politeness_delay_ms = delay_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.max_concurrent_fetches = concurrency;
        }
        if self.no_collect {
            config.crawler.collect_pages = false;
        }
        if let Some(sitemap) = &self.sitemap {
            config.output.sitemap_path = sitemap.clone();
        }
        if let Some(sitegraph) = &self.sitegraph {
            config.output.sitegraph_path = sitegraph.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration after applying command-line options")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitegraph Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Dispatch queue capacity: {}",
        config.crawler.dispatch_queue_capacity
    );
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    if config.crawler.crawl_timeout_secs > 0 {
        println!("  Crawl timeout: {}s", config.crawler.crawl_timeout_secs);
    } else {
        println!("  Crawl timeout: none");
    }
    println!("  Collect pages: {}", config.crawler.collect_pages);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!(
        "\nExcluded Paths ({}):",
        config.filters.excluded_paths.len()
    );
    for path in &config.filters.excluded_paths {
        println!("  - {}", path);
    }

    println!(
        "\nExcluded Subdomains ({}):",
        config.filters.excluded_subdomains.len()
    );
    for subdomain in &config.filters.excluded_subdomains {
        println!("  - {}", subdomain);
    }

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path);
    println!("  Sitegraph: {}", config.output.sitegraph_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let output = config.output.clone();
    let engine = Engine::from_config(config).context("Failed to build the HTTP client")?;

    let shutdown = engine.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            shutdown.cancel();
        }
    });

    let outcome = engine.run().await.context("Crawl failed")?;
    if outcome.quiesced {
        tracing::info!("Crawl completed successfully");
    } else {
        tracing::warn!("Crawl stopped early, writing partial results");
    }

    write_reports(&output, &outcome.site).context("Failed to write crawl reports")?;

    print_statistics(&outcome.statistics());

    Ok(())
}
