//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `EntryState`: Tracks a single frontier entry from dequeue to its outcome
//!   (pending, fetching, fetched, persisted, etc.)

mod entry_state;

pub use entry_state::EntryState;
