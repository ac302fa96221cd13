/// Entry state definitions for tracking crawl progress
///
/// This module defines every state a frontier entry can pass through between
/// being dequeued and reaching its outcome.
use std::fmt;

/// Represents the current state of a frontier entry in the crawl process
///
/// ```text
/// Pending ──> Discarded
///    │
///    └──> Fetching ──> FetchFailed
///            │    └──> NonHtml
///            └──> Fetched ──> Persisted
///                     └────> SkippedDuplicateUrl
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    // ===== Active States =====
    /// Entry has been dequeued but not yet checked
    Pending,

    /// Page is currently being fetched
    Fetching,

    /// Page was fetched and is HTML; a record has been built
    Fetched,

    // ===== Terminal Success States =====
    /// Record was appended to the result store
    Persisted,

    /// A record for this URL already existed (resume); nothing was appended
    SkippedDuplicateUrl,

    // ===== Terminal Skip States =====
    /// Entry was already visited or lies beyond the maximum depth
    Discarded,

    /// Response was not HTML; no record, no link discovery
    NonHtml,

    // ===== Terminal Error States =====
    /// Transport failure (timeout, connection error, DNS failure)
    FetchFailed,
}

impl EntryState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Fetching | Self::Fetched)
    }

    /// Returns true if the page's links are followed from this state
    pub fn discovers_links(&self) -> bool {
        matches!(self, Self::Persisted | Self::SkippedDuplicateUrl)
    }

    /// Returns true if moving from this state to `next` is allowed
    pub fn can_transition_to(&self, next: EntryState) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::Discarded)
                | (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::FetchFailed)
                | (Self::Fetching, Self::NonHtml)
                | (Self::Fetching, Self::Fetched)
                | (Self::Fetched, Self::Persisted)
                | (Self::Fetched, Self::SkippedDuplicateUrl)
        )
    }

    /// Converts the state to its log/string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Persisted => "persisted",
            Self::SkippedDuplicateUrl => "skipped_duplicate_url",
            Self::Discarded => "discarded",
            Self::NonHtml => "non_html",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all possible entry states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Fetched,
            Self::Persisted,
            Self::SkippedDuplicateUrl,
            Self::Discarded,
            Self::NonHtml,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
