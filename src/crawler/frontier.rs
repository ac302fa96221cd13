//! Crawl frontier: the breadth-first queue of URLs still to process
//!
//! This module handles:
//! - FIFO ordering of (url, depth) entries, which makes the traversal BFS
//! - The visited set, marked once per URL at dequeue time
//! - Rejecting URLs that are already visited or already waiting in the queue
//! - An optional cap on queued entries

use std::collections::{HashSet, VecDeque};

/// A URL waiting in the frontier, with its BFS distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// Frontier manages the queue and the visited set
///
/// Each URL is queued at most once while it waits and never again once it
/// has been visited, so cyclic link graphs terminate without extra bookkeeping.
/// Depth limits are not enforced here; the coordinator drops too-deep entries
/// when it dequeues them.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Entries in discovery order
    queue: VecDeque<FrontierEntry>,

    /// URLs currently in `queue`
    queued: HashSet<String>,

    /// URLs that have been dequeued and processed (successfully or not)
    visited: HashSet<String>,

    /// Maximum queued entries (0 = unbounded)
    capacity: usize,

    /// Entries rejected because the queue was full
    overflowed: u64,
}

impl Frontier {
    /// Creates an empty, unbounded frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty frontier holding at most `capacity` queued entries
    ///
    /// A capacity of 0 means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Adds a URL to the back of the queue
    ///
    /// Returns false (and changes nothing) if the URL was already visited, is
    /// already queued, or the queue is at capacity.
    pub fn enqueue(&mut self, url: impl Into<String>, depth: u32) -> bool {
        let url = url.into();

        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }

        if self.capacity > 0 && self.queue.len() >= self.capacity {
            self.overflowed += 1;
            tracing::warn!(
                "Frontier full ({} entries), dropping {} at depth {}",
                self.capacity,
                url,
                depth
            );
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the oldest entry, or `None` once the queue is exhausted
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(&entry.url);
        Some(entry)
    }

    /// Marks a URL as visited; returns false if it already was
    ///
    /// This is the single check-and-mark step: callers must not test
    /// [`Frontier::is_visited`] first and mark later.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Returns whether a URL has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns the number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns how many entries were dropped because the queue was full
    pub fn overflowed(&self) -> u64 {
        self.overflowed
    }
}
