//! Storage module for persisting crawl results
//!
//! This module handles the durable side of a crawl:
//! - The [`CrawlRecord`] written once per scraped URL
//! - The append-only JSON Lines store
//! - Replaying stored records into resume state

mod jsonl;
mod traits;

pub use jsonl::{read_records, JsonlStore, RecordScan};
pub use traits::{ResultStore, StorageError, StorageResult};

use crate::content::KeywordDensity;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One stored result per successfully fetched HTML page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// The exact URL taken from the frontier
    pub url: String,

    /// The page's declared canonical URL, or `url` when none is declared
    pub canonical: String,

    pub is_canonical: bool,

    /// True when the content fingerprint was already owned by another page
    pub is_duplicate: bool,

    /// Canonical URL owning the fingerprint; omitted unless `is_duplicate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<String>,

    pub status_code: u16,
    pub title: String,
    pub meta_description: String,
    pub word_count: usize,
    pub keyword_density: KeywordDensity,
    pub content_hash: String,

    /// BFS distance from the seed (seed = 0)
    pub depth: u32,
}

/// In-memory state rebuilt from the store before a crawl starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeState {
    /// URLs that already have a stored record
    pub scraped: HashSet<String>,

    /// Content hash -> canonical URL of the first page that produced it
    pub fingerprints: HashMap<String, String>,

    /// Number of stored lines that could not be parsed
    pub malformed: usize,
}

impl ResumeState {
    /// Folds one stored record into the state
    ///
    /// Records are replayed in file order, so the first owner of a hash wins.
    /// A duplicate record names the owner in `duplicate_of`; anything else
    /// owns its hash through its canonical URL (or its own URL if the field is
    /// missing from an older record).
    pub fn absorb(&mut self, entry: StoredEntry) {
        if let Some(hash) = entry.content_hash {
            let owner = entry
                .duplicate_of
                .or(entry.canonical)
                .unwrap_or_else(|| entry.url.clone());
            self.fingerprints.entry(hash).or_insert(owner);
        }
        self.scraped.insert(entry.url);
    }
}

/// The subset of a stored record needed to resume
///
/// Only `url` is required, so partially written or older records still
/// contribute what they have.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredEntry {
    pub url: String,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub duplicate_of: Option<String>,
}
