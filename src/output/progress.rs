//! In-place console progress for the crawl loop
//!
//! The counter is rewritten on one stdout line with a carriage return. It is
//! kept separate from tracing output and is not part of the results file.

use std::io::{self, Write};

/// Running count of scraped URLs printed on a single console line
#[derive(Debug, Clone, Default)]
pub struct Progress {
    enabled: bool,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A reporter that prints nothing
    pub fn hidden() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rewrites the counter line with the current scraped count
    pub fn scraped(&self, count: u64) {
        if !self.enabled {
            return;
        }

        let mut stdout = io::stdout().lock();
        // Console progress is best-effort; a closed stdout must not stop the crawl
        let _ = write!(stdout, "\r{}", scraped_line(count));
        let _ = stdout.flush();
    }

    /// Ends the counter line and prints the completion message
    pub fn finish(&self) {
        if self.enabled {
            println!("\n[✓] Crawl finished.");
        }
    }
}

fn scraped_line(count: u64) -> String {
    format!("[✓] Scraped URLs: {}", count)
}
