//! Mnamky: a paginated blog listing crawler
//!
//! This crate walks every listing page of a blog catalogue, extracts the
//! title, link, summary and image of each entry, and exports the entries as
//! a CSV table ordered by the sequence number embedded in their titles.

pub mod config;
pub mod crawler;
pub mod entry;
pub mod output;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Pagination control not usable on {url}: {message}")]
    Pagination { url: String, message: String },

    #[error("Requested page number {page} does not exist in the page list (1..={last})")]
    PageOutOfRange { page: u32, last: u32 },

    #[error("Missing element matching '{selector}'")]
    MissingElement { selector: String },

    #[error("Element matching '{selector}' has no '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("Invalid sequence number '{value}' in title '{title}'")]
    InvalidSequenceNumber { title: String, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid title pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{PageCursor, PageList, PageParser};
pub use entry::{entries_to_table, Entry, EntryTable, SelectorTemplate, SiteTemplate};
