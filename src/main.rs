//! Sitetrawl main entry point
//!
//! This is the command-line interface for the Sitetrawl crawler and sitemap
//! resolver.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitetrawl::config::{load_config_with_hash, validate, validate_seed_url, Config};
use sitetrawl::crawler::Coordinator;
use sitetrawl::output::{load_statistics, print_run_summary, print_statistics};
use sitetrawl::sitemap::{ChunkWriter, SitemapResolver};
use sitetrawl::storage::JsonlStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitetrawl: a resumable single-domain crawler
///
/// Crawls one domain breadth-first from a seed URL and appends one JSON
/// record per HTML page to a results file. Re-running against the same file
/// resumes without writing any page twice.
#[derive(Parser, Debug)]
#[command(name = "sitetrawl")]
#[command(version)]
#[command(about = "A resumable single-domain crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a domain breadth-first from a seed URL
    Crawl(CrawlArgs),

    /// Resolve a sitemap (or sitemap index) into chunked URL files
    Sitemap(SitemapArgs),

    /// Show statistics for an existing results file
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL
    #[arg(short, long)]
    url: String,

    /// Maximum crawl depth (seed = 0)
    #[arg(long)]
    depth: Option<u32>,

    /// Results file (JSON Lines, appended)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Seed for the identity rotation RNG
    #[arg(long, value_name = "N")]
    seed_rng: Option<u64>,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct SitemapArgs {
    /// Sitemap or sitemap index URL
    #[arg(short, long)]
    url: String,

    /// Directory receiving urls_<n>.jsonl files
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// URLs per output file
    #[arg(long, value_name = "N")]
    chunk_size: Option<usize>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Results file to summarise
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl(args) => handle_crawl(config, args, cli.quiet).await,
        Command::Sitemap(args) => handle_sitemap(config, args).await,
        Command::Stats(args) => handle_stats(&config, args),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitetrawl=info,warn"),
            1 => EnvFilter::new("sitetrawl=debug,info"),
            2 => EnvFilter::new("sitetrawl=trace,debug"),
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

/// Loads the configuration file if one was given, otherwise the defaults
fn load_configuration(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the crawl command
async fn handle_crawl(mut config: Config, args: CrawlArgs, quiet: bool) -> Result<()> {
    if let Some(depth) = args.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(output) = &args.output {
        config.output.results_path = output.to_string_lossy().into_owned();
    }
    if let Some(timeout) = args.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if args.seed_rng.is_some() {
        config.crawler.identity_seed = args.seed_rng;
    }
    validate(&config).context("Invalid crawl settings")?;

    let seed = validate_seed_url(&args.url)?;

    if args.dry_run {
        print_dry_run(&config, &seed);
        return Ok(());
    }

    let results_path = PathBuf::from(&config.output.results_path);
    let store = JsonlStore::open(&results_path)
        .with_context(|| format!("Failed to open results file {}", results_path.display()))?;

    let mut coordinator = Coordinator::new(&config, seed, store)?.with_progress(!quiet);

    let shutdown = coordinator.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current page (Ctrl-C again to abort)");
            shutdown.trigger();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let stats = coordinator.run().await.context("Crawl failed")?;

    if !quiet {
        println!();
        print_run_summary(&stats);
        println!("\nResults: {}", results_path.display());
    }

    Ok(())
}

/// Shows what a crawl would do without touching the network or the results file
fn print_dry_run(config: &Config, seed: &url::Url) {
    println!("=== Sitetrawl Dry Run ===\n");

    println!("Seed: {}", seed);
    println!("  Domain scope: {}", seed.host_str().unwrap_or_default());

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    if config.crawler.max_frontier > 0 {
        println!("  Max frontier: {}", config.crawler.max_frontier);
    } else {
        println!("  Max frontier: unbounded");
    }
    match config.crawler.identity_seed {
        Some(seed) => println!("  Identity seed: {}", seed),
        None => println!("  Identity seed: random"),
    }

    println!("\nIdentities ({}):", config.http.user_agents.len());
    for agent in &config.http.user_agents {
        println!("  - {}", agent);
    }

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    match sitetrawl::storage::read_records(Path::new(&config.output.results_path)) {
        Ok(scan) if !scan.records.is_empty() => {
            println!("  Existing records: {} (crawl will resume)", scan.records.len());
        }
        Ok(_) => println!("  Existing records: none"),
        Err(e) => println!("  Existing records: unreadable ({})", e),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the sitemap command
async fn handle_sitemap(mut config: Config, args: SitemapArgs) -> Result<()> {
    if let Some(dir) = &args.out_dir {
        config.output.sitemap_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(chunk_size) = args.chunk_size {
        config.output.sitemap_chunk_size = chunk_size;
    }
    validate(&config).context("Invalid sitemap settings")?;

    let resolver = SitemapResolver::new(&config.http)?;
    let urls = resolver
        .resolve(&args.url)
        .await
        .with_context(|| format!("Failed to resolve sitemap {}", args.url))?;

    let writer = ChunkWriter::new(&config.output.sitemap_dir, config.output.sitemap_chunk_size);
    let files = writer.save(&urls)?;

    println!(
        "[✓] Saved {} URLs into {} files under {}",
        urls.len(),
        files.len(),
        writer.dir().display()
    );

    Ok(())
}

/// Handles the stats command
fn handle_stats(config: &Config, args: StatsArgs) -> Result<()> {
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.results_path));

    println!("Results file: {}\n", path.display());

    let stats = load_statistics(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    print_statistics(&stats);

    Ok(())
}
