//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Rebuilding resume state from the result store
//! - Driving the breadth-first frontier
//! - Fetching, extracting and fingerprinting pages
//! - Classifying duplicates and persisting records
//! - Stopping cleanly on a shutdown request

use crate::config::Config;
use crate::content::{fingerprint, keyword_density, word_count};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_html;
use crate::crawler::ShutdownSignal;
use crate::output::Progress;
use crate::state::EntryState;
use crate::storage::{CrawlRecord, JsonlStore, ResultStore};
use crate::url::frontier_candidate;
use crate::CrawlError;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use url::Url;

/// Counters describing one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Entries taken from the frontier
    pub dequeued: u64,

    /// HTML pages fetched and extracted
    pub fetched: u64,

    /// Records appended to the store
    pub persisted: u64,

    /// Pages fetched again after a resume but not re-appended
    pub already_scraped: u64,

    /// Persisted records flagged as content duplicates
    pub duplicates: u64,

    /// Transport failures (timeout, connection, DNS)
    pub fetch_failures: u64,

    /// Responses skipped because they were not HTML
    pub non_html: u64,

    /// Entries dropped for exceeding the maximum depth
    pub depth_dropped: u64,

    /// Whether the run stopped on a shutdown request before the frontier emptied
    pub interrupted: bool,
}

/// Main crawler coordinator structure
///
/// The coordinator is the single owner of the frontier, the visited and
/// scraped sets, the fingerprint map and the store, and processes one entry
/// at a time. Check-and-mark on the visited set and first-seen-wins on the
/// fingerprint map are therefore plain map operations.
pub struct Coordinator<S: ResultStore = JsonlStore> {
    seed: Url,
    max_depth: u32,
    store: S,
    frontier: Frontier,
    fetcher: Fetcher,

    /// URLs with a stored record
    scraped: HashSet<String>,

    /// Content hash -> canonical URL of its first owner
    fingerprints: HashMap<String, String>,

    shutdown: ShutdownSignal,
    progress: Progress,
    stats: CrawlStats,
}

impl<S: ResultStore> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// Replays the store so that already-scraped URLs are never appended
    /// again and duplicate detection continues from the stored fingerprints.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - The URL the crawl starts from (depth 0)
    /// * `store` - Durable result store, possibly holding a previous run
    pub fn new(config: &Config, seed: Url, store: S) -> Result<Self, CrawlError> {
        let resume = store.load_existing()?;

        if !resume.scraped.is_empty() {
            tracing::info!(
                "Resuming: {} pages already recorded, {} content fingerprints known",
                resume.scraped.len(),
                resume.fingerprints.len()
            );
        }
        if resume.malformed > 0 {
            tracing::warn!("Skipped {} malformed stored records", resume.malformed);
        }

        Ok(Self {
            seed,
            max_depth: config.crawler.max_depth,
            store,
            frontier: Frontier::with_capacity(config.crawler.max_frontier),
            fetcher: Fetcher::new(config)?,
            scraped: resume.scraped,
            fingerprints: resume.fingerprints,
            shutdown: ShutdownSignal::new(),
            progress: Progress::hidden(),
            stats: CrawlStats::default(),
        })
    }

    /// Enables or disables the in-place console counter
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = Progress::new(enabled);
        self
    }

    /// Returns a handle that stops the crawl before the next dequeue
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Returns the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the main crawl loop until the frontier is exhausted
    ///
    /// Per-entry failures (transport errors, non-HTML responses) are logged
    /// and skipped. A store write failure aborts the run.
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlError> {
        tracing::info!(
            "Starting crawl: {} | Max depth: {}",
            self.seed,
            self.max_depth
        );

        let start_time = Instant::now();
        self.frontier.enqueue(self.seed.as_str(), 0);

        loop {
            if self.shutdown.is_triggered() {
                tracing::info!(
                    "Shutdown requested, stopping with {} URLs still queued",
                    self.frontier.len()
                );
                self.stats.interrupted = true;
                break;
            }

            let Some(entry) = self.frontier.dequeue() else {
                tracing::debug!("Frontier is empty, crawl complete");
                break;
            };

            self.stats.dequeued += 1;
            self.process_entry(entry).await?;
        }

        self.progress.finish();

        tracing::info!(
            "Crawl finished: {} new records, {} pages fetched, {} visited in {:?}",
            self.stats.persisted,
            self.stats.fetched,
            self.frontier.visited_count(),
            start_time.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Processes one frontier entry through the per-entry state machine
    async fn process_entry(&mut self, entry: FrontierEntry) -> Result<(), CrawlError> {
        let url = entry.url.as_str();
        let mut state = EntryState::Pending;

        if entry.depth > self.max_depth {
            advance(url, &mut state, EntryState::Discarded)?;
            self.stats.depth_dropped += 1;
            tracing::trace!("Dropping {} at depth {}", url, entry.depth);
            return Ok(());
        }

        let page_url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                advance(url, &mut state, EntryState::Discarded)?;
                tracing::warn!("Skipping unparsable frontier entry {}: {}", url, e);
                return Ok(());
            }
        };

        if !self.frontier.mark_visited(url) {
            advance(url, &mut state, EntryState::Discarded)?;
            tracing::trace!("Already visited {}", url);
            return Ok(());
        }

        advance(url, &mut state, EntryState::Fetching)?;
        tracing::debug!("Fetching {} (depth {})", url, entry.depth);

        let (status_code, body) = match self.fetcher.fetch(url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
                ..
            } => {
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                (status_code, body)
            }
            FetchResult::ContentMismatch {
                status_code,
                content_type,
            } => {
                advance(url, &mut state, EntryState::NonHtml)?;
                self.stats.non_html += 1;
                tracing::debug!(
                    "Skipping non-HTML {} (HTTP {}, {})",
                    url,
                    status_code,
                    content_type
                );
                return Ok(());
            }
            FetchResult::NetworkError { error } => {
                advance(url, &mut state, EntryState::FetchFailed)?;
                self.stats.fetch_failures += 1;
                tracing::warn!("Failed to fetch {}: {}", url, error);
                return Ok(());
            }
        };

        let page = parse_html(&body, &page_url);

        let canonical = page.canonical.unwrap_or_else(|| url.to_string());
        let content_hash = fingerprint(&page.text);

        let duplicate_of = match self.fingerprints.entry(content_hash.clone()) {
            Entry::Occupied(owner) => Some(owner.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(canonical.clone());
                None
            }
        };

        let record = CrawlRecord {
            url: url.to_string(),
            is_canonical: url == canonical,
            canonical,
            is_duplicate: duplicate_of.is_some(),
            duplicate_of,
            status_code,
            title: page.title,
            meta_description: page.meta_description,
            word_count: word_count(&page.text),
            keyword_density: keyword_density(&page.text),
            content_hash,
            depth: entry.depth,
        };

        advance(url, &mut state, EntryState::Fetched)?;
        self.stats.fetched += 1;

        if self.scraped.contains(url) {
            advance(url, &mut state, EntryState::SkippedDuplicateUrl)?;
            self.stats.already_scraped += 1;
            tracing::debug!("{} already recorded, not appending", url);
        } else {
            self.store.append(&record)?;
            self.scraped.insert(record.url.clone());
            advance(url, &mut state, EntryState::Persisted)?;

            self.stats.persisted += 1;
            if record.is_duplicate {
                self.stats.duplicates += 1;
                tracing::debug!(
                    "{} duplicates content of {}",
                    url,
                    record.duplicate_of.as_deref().unwrap_or_default()
                );
            }
            self.progress.scraped(self.stats.persisted);
        }

        if state.discovers_links() {
            self.discover_links(&page_url, &page.links, entry.depth);
        }

        Ok(())
    }

    /// Enqueues every same-domain link not yet visited at `depth + 1`
    fn discover_links(&mut self, page_url: &Url, links: &[String], depth: u32) {
        let next_depth = depth.saturating_add(1);
        let mut added = 0;

        for link in links {
            match frontier_candidate(page_url, link, &self.seed) {
                Some(candidate) => {
                    if self.frontier.enqueue(candidate, next_depth) {
                        added += 1;
                    }
                }
                None => tracing::trace!("Not following {}", link),
            }
        }

        tracing::debug!(
            "Discovered {} new links on {} ({} queued)",
            added,
            page_url,
            self.frontier.len()
        );
    }
}

/// Moves an entry to `next`, rejecting transitions the state machine forbids
fn advance(url: &str, state: &mut EntryState, next: EntryState) -> Result<(), CrawlError> {
    if !state.can_transition_to(next) {
        return Err(CrawlError::InvalidTransition {
            url: url.to_string(),
            from: *state,
            to: next,
        });
    }

    *state = next;
    Ok(())
}
