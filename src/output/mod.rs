//! Output module for exporting crawl results
//!
//! This module handles:
//! - Writing the ordered entry table as CSV
//! - Summarising a finished crawl

pub mod stats;
mod table_writer;

pub use stats::{print_statistics, CrawlStats};
pub use table_writer::{write_csv, write_csv_to};
