//! Page-by-page entry extraction
//!
//! [`PageParser`] walks the listing pages of one catalogue in order and turns
//! every entry container into an [`Entry`]. Pages are fetched one at a time;
//! [`PageCursor`] exposes the walk incrementally, and [`PageParser::parse_all`]
//! collects it for export.

use crate::config::{Config, DEFAULT_CSV_PATH};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::pagination::PageList;
use crate::entry::{entries_to_table, Entry, SelectorTemplate, SiteTemplate};
use crate::output::{write_csv, CrawlStats};
use crate::{Result, ScrapeError};
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Crawls the listing pages of one catalogue
pub struct PageParser {
    client: Client,
    template: Arc<dyn SiteTemplate>,
    page_list: PageList,
    output_path: PathBuf,
}

impl PageParser {
    /// Creates a parser, discovering the pagination of `base_url`
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `template` - Site template used for every page
    /// * `base_url` - Listing URL without a pagination query
    /// * `until_page` - Last page to visit; all pages if `None`
    pub async fn new(
        client: Client,
        template: Arc<dyn SiteTemplate>,
        base_url: &str,
        until_page: Option<u32>,
    ) -> Result<Self> {
        let page_list = PageList::discover(&client, template.as_ref(), base_url, until_page).await?;

        Ok(Self {
            client,
            template,
            page_list,
            output_path: PathBuf::from(DEFAULT_CSV_PATH),
        })
    }

    /// Creates a parser from configuration
    ///
    /// The base URL must be set; the CSV path from the configuration becomes
    /// the default export location.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = build_http_client(&config.http)?;
        let template = Arc::new(SelectorTemplate::from_config(&config.template)?);

        let parser = Self::new(client, template, base_url, config.target.until_page).await?;
        Ok(parser.with_output_path(&config.output.csv_path))
    }

    /// Sets the path used by [`parse_and_export`](Self::parse_and_export)
    /// when none is given
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn page_list(&self) -> &PageList {
        &self.page_list
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Fetches a listing page and returns the markup of its entry containers
    ///
    /// Fragments are returned in document order.
    pub async fn fetch_entry_fragments(&self, page_num: u32) -> Result<Vec<String>> {
        let url = self.page_list.get_page_url(page_num)?;
        let body = fetch_page(&self.client, &url).await?;

        let document = Html::parse_document(&body);
        let fragments: Vec<String> = self
            .template
            .entry_fragments(&document)
            .into_iter()
            .map(|fragment| fragment.html())
            .collect();

        tracing::debug!("Found {} entries on {}", fragments.len(), url);
        Ok(fragments)
    }

    /// Parses every entry of a listing page
    ///
    /// The first malformed entry fails the whole page.
    pub async fn parse_page(&self, page_num: u32) -> Result<Vec<Entry>> {
        self.fetch_entry_fragments(page_num)
            .await?
            .iter()
            .map(|fragment| Entry::from_fragment(fragment, self.template.as_ref()))
            .collect()
    }

    /// Returns a cursor over the pages to visit, starting at page 1
    pub fn pages(&self) -> PageCursor<'_> {
        PageCursor {
            parser: self,
            next: 1,
        }
    }

    /// Parses pages `1..=until_page`, concatenating their entries in order
    pub async fn parse_all(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut pages = self.pages();

        while let Some(page) = pages.next_page().await {
            entries.extend(page?.entries);
        }

        Ok(entries)
    }

    /// Parses all pages and writes the ordered table as CSV
    ///
    /// Nothing is written unless every page parsed successfully.
    ///
    /// # Arguments
    ///
    /// * `output_path` - Destination file; the configured path if `None`
    pub async fn parse_and_export(&self, output_path: Option<&Path>) -> Result<CrawlStats> {
        let started_at = Utc::now();
        let path = output_path.unwrap_or(self.output_path.as_path());

        let entries = self.parse_all().await?;
        let table = entries_to_table(&entries);
        write_csv(&table, path)?;

        tracing::info!("Wrote {} entries to {}", table.len(), path.display());

        Ok(CrawlStats::collect(
            &entries,
            self.page_list.until_page(),
            path,
            started_at,
            Utc::now(),
        ))
    }
}

/// Entries of one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntries {
    /// 1-based page number
    pub page: u32,
    pub entries: Vec<Entry>,
}

/// Incremental walk over the listing pages of a [`PageParser`]
///
/// Each call to [`next_page`](Self::next_page) fetches and parses one page.
/// A failed page is not skipped: the cursor stays on it, so calling
/// `next_page` again retries the same page.
pub struct PageCursor<'p> {
    parser: &'p PageParser,
    next: u32,
}

impl<'p> PageCursor<'p> {
    /// Fetches and parses the next page, or returns `None` past `until_page`
    pub async fn next_page(&mut self) -> Option<Result<PageEntries>> {
        let until_page = self.parser.page_list.until_page();
        if self.next > until_page {
            return None;
        }

        let page = self.next;
        let result = self.parser.parse_page(page).await.map(|entries| {
            tracing::info!(
                "Parsed page {}/{}: {} entries",
                page,
                until_page,
                entries.len()
            );
            PageEntries { page, entries }
        });

        if result.is_ok() {
            self.next += 1;
        }

        Some(result)
    }

    /// Page that the next call will fetch
    pub fn position(&self) -> u32 {
        self.next
    }

    /// Pages left to visit
    pub fn remaining(&self) -> u32 {
        (self.parser.page_list.until_page() + 1).saturating_sub(self.next)
    }

    /// Moves the cursor so the next call fetches `page`
    pub fn seek(&mut self, page: u32) -> Result<()> {
        let until_page = self.parser.page_list.until_page();
        if page < 1 || page > until_page {
            return Err(ScrapeError::PageOutOfRange {
                page,
                last: until_page,
            });
        }
        self.next = page;
        Ok(())
    }

    /// Restarts the walk from page 1
    pub fn rewind(&mut self) {
        self.next = 1;
    }
}
