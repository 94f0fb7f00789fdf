//! Configuration module for Catalog-Crawler
//!
//! This module handles loading, parsing, and validating configuration, either
//! from a TOML file or from the process environment.
//!
//! # Example
//!
//! ```no_run
//! use catalog_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Item delay: {}ms", config.crawl.item_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, CatalogConfig, Config, CrawlSettings, RetryConfig, SiteUrls};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_from_vars, load_config, load_config_from_env,
    load_config_with_hash,
};
