use crate::config::types::{Config, HttpConfig, OutputConfig, TargetConfig, TemplateConfig};
use crate::entry::{compile_number_pattern, compile_selector};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The base URL may still be missing here: it is commonly given on the
/// command line and checked again by [`Config::base_url`].
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    validate_template_config(&config.template)?;
    Ok(())
}

/// Validates the crawl target
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    if let Some(base_url) = &config.base_url {
        validate_base_url(base_url)?;
    }

    if config.until_page == Some(0) {
        return Err(ConfigError::Validation(
            "until_page must be >= 1, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a base URL is an absolute http(s) URL
pub fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            other
        ))),
    }
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1, got 0".to_string(),
        ));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that every selector and the number pattern compile
fn validate_template_config(config: &TemplateConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.pagination_last,
        &config.entry_container,
        &config.image,
        &config.body_link,
        &config.body_text,
    ] {
        compile_selector(selector)?;
    }

    if config.image_srcset_attribute.trim().is_empty() {
        return Err(ConfigError::Validation(
            "image_srcset_attribute cannot be empty".to_string(),
        ));
    }

    if config.image_srcset_marker.is_empty() {
        return Err(ConfigError::Validation(
            "image_srcset_marker cannot be empty".to_string(),
        ));
    }

    compile_number_pattern(&config.number_pattern)?;

    Ok(())
}
