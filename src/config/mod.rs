//! Configuration module for Mnamky
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use mnamky::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mnamky.toml")).unwrap();
//! println!("Entries will be written to: {}", config.output.csv_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, TargetConfig, TemplateConfig, DEFAULT_CSV_PATH,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_base_url};

use crate::ConfigError;

impl Config {
    /// Returns the validated base URL of the crawl target
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        let base_url = self.target.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("base_url is required (config or command line)".to_string())
        })?;
        validate_base_url(base_url)?;
        Ok(base_url)
    }
}
