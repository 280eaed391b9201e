//! Statistics of a finished crawl
//!
//! This module summarises what an export contains and prints it for the
//! command-line user.

use crate::entry::Entry;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Number of listing pages visited
    pub pages_visited: u32,

    /// Number of entries written to the table
    pub entries: usize,

    /// Entries whose title carries a sequence number
    pub numbered_entries: usize,

    /// Entries exported with the "no image" placeholder
    pub entries_without_image: usize,

    /// Where the table was written
    pub output_path: PathBuf,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStats {
    /// Computes statistics for a set of exported entries
    pub fn collect(
        entries: &[Entry],
        pages_visited: u32,
        output_path: &Path,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pages_visited,
            entries: entries.len(),
            numbered_entries: entries.iter().filter(|e| e.number().is_some()).count(),
            entries_without_image: entries.iter().filter(|e| e.image_url().is_none()).count(),
            output_path: output_path.to_path_buf(),
            started_at,
            finished_at,
        }
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Returns the share of entries with a sequence number as a percentage
    pub fn numbered_rate(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        (self.numbered_entries as f64 / self.entries as f64) * 100.0
    }
}

/// Prints crawl statistics to stdout
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Entries exported: {}", stats.entries);
    println!(
        "  Numbered entries: {} ({:.1}%)",
        stats.numbered_entries,
        stats.numbered_rate()
    );
    println!("  Entries without image: {}", stats.entries_without_image);
    println!();

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Duration: {}s", stats.duration_seconds());
    println!("  Output: {}", stats.output_path.display());
}
