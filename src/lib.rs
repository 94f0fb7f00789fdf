//! Catalog-Crawler: publisher crawler and catalog synchronizer
//!
//! This crate walks academic-publisher websites (ACM, MDPI, Springer) down the
//! publication → volume → issue → article hierarchy, normalizes what it finds
//! into a common schema, and pushes new or changed entities to a remote catalog
//! API. Resume state for incremental runs lives entirely in the catalog.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod crawler;
pub mod model;
pub mod sites;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("No extraction adapter registered for {0}")]
    NoAdapter(String),

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

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Outcome, Task};
pub use model::{Article, Issue, Publication, Volume};
pub use sites::Site;
