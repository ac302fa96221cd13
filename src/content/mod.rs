//! Content analysis for fetched pages
//!
//! Fingerprints detect the same rendered text served under different URLs;
//! the keyword-density summary is stored alongside every crawl record.

mod density;
mod fingerprint;

pub use density::{keyword_density, KeywordDensity, KeywordStat, MIN_KEYWORD_LEN, TOP_KEYWORDS};
pub use fingerprint::{fingerprint, word_count};
