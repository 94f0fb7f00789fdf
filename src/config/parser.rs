use crate::config::types::{
    BrowserConfig, CatalogConfig, Config, CrawlSettings, RetryConfig, SiteUrls,
};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable names understood by the crawler
pub const ENV_API_URL: &str = "API_URL";
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";
pub const ENV_BASE_URL_ACM: &str = "BASE_URL_ACM";
pub const ENV_BASE_URL_MDPI: &str = "BASE_URL_MDPI";
pub const ENV_BASE_URL_SPRINGER: &str = "BASE_URL_SPRINGER";

/// Loads and parses a configuration file from the given path
///
/// Environment variables (`API_URL`, `AUTH_TOKEN`, `BASE_URL_*`) override the
/// corresponding file values when set.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Catalog: {}", config.catalog.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate(&config)?;

    Ok(config)
}

/// Builds a configuration purely from the process environment
///
/// A `.env` file in the working directory is loaded first if present.
/// Everything except the catalog and site URLs takes its default value.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    let config = config_from_vars(|key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Builds a configuration from an arbitrary variable lookup
pub fn config_from_vars<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

    Ok(Config {
        catalog: CatalogConfig {
            base_url: require(ENV_API_URL)?,
            token: require(ENV_AUTH_TOKEN)?,
            request_timeout_secs: 30,
        },
        sites: SiteUrls {
            acm: require(ENV_BASE_URL_ACM)?,
            mdpi: require(ENV_BASE_URL_MDPI)?,
            springer: require(ENV_BASE_URL_SPRINGER)?,
        },
        crawl: CrawlSettings::default(),
        browser: BrowserConfig::default(),
        retry: RetryConfig::default(),
    })
}

/// Replaces file values with environment values that are present
fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_API_URL) {
        config.catalog.base_url = value;
    }
    if let Some(value) = lookup(ENV_AUTH_TOKEN) {
        config.catalog.token = value;
    }
    if let Some(value) = lookup(ENV_BASE_URL_ACM) {
        config.sites.acm = value;
    }
    if let Some(value) = lookup(ENV_BASE_URL_MDPI) {
        config.sites.mdpi = value;
    }
    if let Some(value) = lookup(ENV_BASE_URL_SPRINGER) {
        config.sites.springer = value;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a run can be tied back to the exact file it used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
