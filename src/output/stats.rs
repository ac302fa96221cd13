//! Statistics from crawl runs and results files
//!
//! This module provides functionality for summarising an existing results
//! file and for displaying the counters of a finished run.

use crate::crawler::CrawlStats;
use crate::storage::{read_records, CrawlRecord, StorageResult};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Summary of a results file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStatistics {
    /// Number of complete records
    pub total_records: u64,

    /// Number of distinct URLs among the records
    pub unique_urls: u64,

    /// Records flagged as content duplicates
    pub duplicates: u64,

    /// Records whose URL differs from their declared canonical
    pub non_canonical: u64,

    /// Distinct content fingerprints
    pub unique_fingerprints: u64,

    /// Records per crawl depth
    pub depth_breakdown: BTreeMap<u32, u64>,

    /// Records per HTTP status code
    pub status_breakdown: BTreeMap<u16, u64>,

    /// Lines that could not be parsed as records
    pub malformed: u64,
}

impl FileStatistics {
    /// Computes statistics over a set of records
    pub fn from_records(records: &[CrawlRecord], malformed: usize) -> Self {
        let mut stats = Self {
            total_records: records.len() as u64,
            malformed: malformed as u64,
            ..Self::default()
        };

        let mut urls = HashSet::new();
        let mut fingerprints = HashSet::new();

        for record in records {
            urls.insert(record.url.as_str());
            fingerprints.insert(record.content_hash.as_str());

            if record.is_duplicate {
                stats.duplicates += 1;
            }
            if !record.is_canonical {
                stats.non_canonical += 1;
            }

            *stats.depth_breakdown.entry(record.depth).or_insert(0) += 1;
            *stats.status_breakdown.entry(record.status_code).or_insert(0) += 1;
        }

        stats.unique_urls = urls.len() as u64;
        stats.unique_fingerprints = fingerprints.len() as u64;
        stats
    }
}

/// Loads statistics from a results file
///
/// A missing file yields empty statistics.
pub fn load_statistics(path: &Path) -> StorageResult<FileStatistics> {
    let scan = read_records(path)?;
    Ok(FileStatistics::from_records(&scan.records, scan.malformed))
}

/// Prints results file statistics to stdout in a formatted manner
pub fn print_statistics(stats: &FileStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Records: {}", stats.total_records);
    println!("  Unique URLs: {}", stats.unique_urls);
    println!("  Unique content fingerprints: {}", stats.unique_fingerprints);
    println!(
        "  Duplicate content: {} ({:.1}%)",
        stats.duplicates,
        percentage(stats.duplicates, stats.total_records)
    );
    println!("  Non-canonical pages: {}", stats.non_canonical);
    if stats.malformed > 0 {
        println!("  Malformed lines skipped: {}", stats.malformed);
    }
    println!();

    if !stats.depth_breakdown.is_empty() {
        println!("Records by Depth:");
        for (depth, count) in &stats.depth_breakdown {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if !stats.status_breakdown.is_empty() {
        println!("Records by Status:");
        for (status, count) in &stats.status_breakdown {
            println!("  {}: {}", status, count);
        }
        println!();
    }
}

/// Prints the counters of a finished crawl run
pub fn print_run_summary(stats: &CrawlStats) {
    println!("=== Crawl Run ===\n");
    println!("  Dequeued: {}", stats.dequeued);
    println!("  Fetched: {}", stats.fetched);
    println!("  New records: {}", stats.persisted);
    println!("  Duplicate content: {}", stats.duplicates);
    println!("  Already recorded: {}", stats.already_scraped);
    println!("  Non-HTML skipped: {}", stats.non_html);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Beyond max depth: {}", stats.depth_dropped);
    if stats.interrupted {
        println!("  Stopped early: yes");
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
