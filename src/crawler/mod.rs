//! Crawler module for listing page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing pages
//! - Charset detection and decoding of page bodies
//! - Pagination discovery and page addressing
//! - Page-by-page entry extraction

mod decoding;
mod fetcher;
mod page_parser;
mod pagination;

pub use decoding::decode_body;
pub use fetcher::{build_http_client, fetch_page};
pub use page_parser::{PageCursor, PageEntries, PageParser};
pub use pagination::PageList;

use crate::config::Config;
use crate::output::CrawlStats;
use crate::ScrapeError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and site template
/// 2. Discover the listing pages
/// 3. Parse every page up to the configured limit
/// 4. Write the ordered entries to the configured CSV file
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed and the table was written
/// * `Err(ScrapeError)` - Crawl failed; no file was written
pub async fn crawl(config: &Config) -> Result<CrawlStats, ScrapeError> {
    let parser = PageParser::from_config(config).await?;
    parser.parse_and_export(None).await
}
