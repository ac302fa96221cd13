//! Sitetrawl: a resumable single-domain crawler
//!
//! This crate walks one web domain breadth-first from a seed URL, fingerprints
//! the visible text of every HTML page it reaches, and appends one JSON record
//! per page to an append-only results file. A killed run can be restarted with
//! the same file: pages already recorded are never written twice and duplicate
//! detection picks up where it left off.
//!
//! It also resolves sitemap documents (including sitemap indexes) into flat,
//! chunked URL lists.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sitetrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] sitemap::SitemapError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition for {url}: {from:?} -> {to:?}")]
    InvalidTransition {
        url: String,
        from: state::EntryState,
        to: state::EntryState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitetrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlStats, ShutdownSignal};
pub use state::EntryState;
pub use storage::{CrawlRecord, JsonlStore, ResultStore};
pub use crate::url::{canonicalize, is_same_domain, resolve_link};
