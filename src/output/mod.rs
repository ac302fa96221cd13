//! Output module for console reporting
//!
//! This module handles:
//! - The in-place scraped-URL counter shown during a crawl
//! - Summaries of finished runs and of existing results files

mod progress;
pub mod stats;

pub use progress::Progress;
pub use stats::{load_statistics, print_run_summary, print_statistics, FileStatistics};
