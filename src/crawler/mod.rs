//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with identity rotation
//! - HTML parsing and link extraction
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlStats};
pub use fetcher::{build_http_client, is_html, FetchResult, Fetcher, IdentityPool};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::storage::JsonlStore;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Cooperative stop request shared between the crawl loop and its caller
///
/// The coordinator checks the flag before every dequeue; a fetch already in
/// flight completes and its record is persisted before the loop exits.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the crawl to stop
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the results file named in the configuration
/// 2. Rebuild resume state from it
/// 3. Crawl breadth-first from `seed` until the frontier is exhausted
///
/// # Example
///
/// ```no_run
/// use sitetrawl::config::Config;
/// use sitetrawl::crawler::crawl;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = Url::parse("https://example.com/")?;
/// let stats = crawl(&Config::default(), seed).await?;
/// println!("{} new records", stats.persisted);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, seed: Url) -> crate::Result<CrawlStats> {
    let store = JsonlStore::open(Path::new(&config.output.results_path))?;
    let mut coordinator = Coordinator::new(config, seed, store)?;
    coordinator.run().await
}
