//! Sitemap resolution
//!
//! Turns a sitemap URL into a flat, sorted list of page URLs and writes it
//! out in fixed-size JSON Lines chunks.
//!
//! # Components
//!
//! - `parser`: Classifies an XML document as a sitemap index or URL set and
//!   collects its `<loc>` entries
//! - `resolver`: Fetches the root sitemap and fans out over index children
//! - `writer`: Writes `{"url": ...}` lines into numbered chunk files

mod parser;
mod resolver;
mod writer;

pub use parser::{parse_sitemap, SitemapDocument};
pub use resolver::SitemapResolver;
pub use writer::ChunkWriter;

use thiserror::Error;

/// Errors that can occur while resolving or saving sitemaps
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request for {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap XML: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sitemap operations
pub type SitemapResult<T> = Result<T, SitemapError>;
