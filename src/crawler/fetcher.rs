//! HTTP fetcher implementation
//!
//! Every listing page is fetched with a plain GET. There are no retries: a
//! failed request or a non-success status aborts the crawl.

use crate::config::HttpConfig;
use crate::crawler::decoding::decode_body;
use crate::{Result, ScrapeError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// Without a configured user agent or timeout the client sends no
/// User-Agent header and waits for responses indefinitely. Idle connections
/// are not kept, so each page's connection closes once its body is read.
///
/// # Example
///
/// ```no_run
/// use mnamky::config::HttpConfig;
/// use mnamky::crawler::build_http_client;
///
/// let config = HttpConfig {
///     user_agent: Some("mnamky/1.0".to_string()),
///     timeout_secs: Some(30),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    if let Some(timeout_secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    builder.build()
}

/// Fetches a page and returns its decoded body
///
/// The charset comes from the `Content-Type` header, then from a `<meta>`
/// declaration in the page, then defaults to UTF-8.
///
/// # Errors
///
/// * `ScrapeError::Http` - The request could not be sent or the body read
/// * `ScrapeError::Status` - The server answered with a non-success status
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response.bytes().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(decode_body(&bytes, content_type.as_deref()))
}
