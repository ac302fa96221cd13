//! Storage traits and error types
//!
//! This module defines the trait interface for result store backends and
//! associated error types.

use crate::storage::{CrawlRecord, ResumeState};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable crawl result stores
///
/// A store is an append-only log of [`CrawlRecord`]s. It is the only durable
/// state of a crawl: visited sets and the fingerprint map are rebuilt from it
/// on every start.
pub trait ResultStore {
    /// Appends one record durably
    ///
    /// A reader must observe either the whole record or none of it. Prior
    /// records are never rewritten. An error here is fatal for the crawl.
    fn append(&mut self, record: &CrawlRecord) -> StorageResult<()>;

    /// Replays all stored records into a fresh [`ResumeState`]
    ///
    /// Malformed records are skipped and counted, never fatal.
    fn load_existing(&self) -> StorageResult<ResumeState>;
}
