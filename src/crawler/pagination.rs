//! Listing page discovery
//!
//! The first listing page carries a pagination control whose "last page"
//! link looks like `...?<key>=<last page>`. From it the crawler learns how
//! many pages exist and how to address each of them.

use crate::crawler::fetcher::fetch_page;
use crate::entry::SiteTemplate;
use crate::{Result, ScrapeError};
use reqwest::Client;
use scraper::Html;

/// The set of listing pages of one catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageList {
    base_url: String,
    page_suffix: String,
    last_page: u32,
    until_page: u32,
}

impl PageList {
    /// Fetches the base URL and reads its pagination control
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `template` - Site template locating the pagination control
    /// * `base_url` - Listing URL without a pagination query
    /// * `until_page` - Last page to visit; all pages if `None`
    pub async fn discover(
        client: &Client,
        template: &dyn SiteTemplate,
        base_url: &str,
        until_page: Option<u32>,
    ) -> Result<Self> {
        let body = fetch_page(client, base_url).await?;
        let document = Html::parse_document(&body);
        let page_list = Self::from_document(template, base_url, &document, until_page)?;

        tracing::info!(
            "Found {} listing pages at {}, visiting {}",
            page_list.last_page,
            base_url,
            page_list.until_page
        );

        Ok(page_list)
    }

    /// Builds the page list from an already parsed first page
    ///
    /// The traversal limit is clamped to `1..=last_page`.
    pub fn from_document(
        template: &dyn SiteTemplate,
        base_url: &str,
        document: &Html,
        until_page: Option<u32>,
    ) -> Result<Self> {
        let href = template.last_page_href(document)?;
        let (key, last_page) = split_pagination_href(&href).map_err(|message| {
            ScrapeError::Pagination {
                url: base_url.to_string(),
                message,
            }
        })?;

        let until_page = until_page.map_or(last_page, |limit| limit.clamp(1, last_page));

        Ok(Self {
            base_url: base_url.to_string(),
            page_suffix: format!("?{}=", key),
            last_page,
            until_page,
        })
    }

    /// Returns the URL of a 1-based listing page
    ///
    /// # Errors
    ///
    /// `ScrapeError::PageOutOfRange` when `page_num` is not in `1..=last_page`
    pub fn get_page_url(&self, page_num: u32) -> Result<String> {
        if page_num < 1 || page_num > self.last_page {
            return Err(ScrapeError::PageOutOfRange {
                page: page_num,
                last: self.last_page,
            });
        }
        Ok(format!("{}{}{}", self.base_url, self.page_suffix, page_num))
    }

    /// URLs of every page that will be visited, in order
    pub fn page_urls(&self) -> Vec<String> {
        (1..=self.until_page)
            .map(|page| format!("{}{}{}", self.base_url, self.page_suffix, page))
            .collect()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of listing pages the site reports
    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// Last page the crawl visits
    pub fn until_page(&self) -> u32 {
        self.until_page
    }
}

/// Splits a last-page link into its query key and page count
///
/// The query must be exactly `<key>=<number>` with a non-empty key and a
/// number of at least 1.
fn split_pagination_href(href: &str) -> std::result::Result<(String, u32), String> {
    let query = href
        .split('?')
        .nth(1)
        .ok_or_else(|| format!("last page link '{}' has no query string", href))?;

    let mut parts = query.split('=');
    let (key, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() => (key, value),
        _ => {
            return Err(format!(
                "last page link query '{}' is not of the form key=number",
                query
            ))
        }
    };

    let last_page = value
        .parse::<u32>()
        .map_err(|e| format!("last page number '{}' is not an integer: {}", value, e))?;

    if last_page == 0 {
        return Err("last page number must be at least 1".to_string());
    }

    Ok((key.to_string(), last_page))
}
