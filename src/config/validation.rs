use crate::config::types::{BrowserConfig, CatalogConfig, Config, CrawlSettings, RetryConfig, SiteUrls};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_site_urls(&config.sites)?;
    validate_crawl_settings(&config.crawl)?;
    validate_browser_config(&config.browser)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

/// Validates catalog API settings
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    validate_base_url("catalog.base-url", &config.base_url)?;

    if config.token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "catalog token cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_site_urls(sites: &SiteUrls) -> Result<(), ConfigError> {
    validate_base_url("sites.acm", &sites.acm)?;
    validate_base_url("sites.mdpi", &sites.mdpi)?;
    validate_base_url("sites.springer", &sites.springer)?;
    Ok(())
}

/// Validates crawl pacing settings
fn validate_crawl_settings(config: &CrawlSettings) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "navigation_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.selector_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "selector_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.update_batch_size == 0 {
        return Err(ConfigError::Validation(
            "update_batch_size must be >= 1".to_string(),
        ));
    }

    if !(1900..=2100).contains(&config.min_year) {
        return Err(ConfigError::Validation(format!(
            "min_year must be a plausible publication year, got {}",
            config.min_year
        )));
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry attempts must be >= 1, got {}",
            config.attempts
        )));
    }
    Ok(())
}

/// Validates that a base URL parses and uses an HTTP(S) scheme
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}
