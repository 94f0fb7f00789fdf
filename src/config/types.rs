use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Catalog-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub sites: SiteUrls,
    #[serde(default)]
    pub crawl: CrawlSettings,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Remote catalog API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (without the `/api` suffix)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Bearer token for the authenticated scraper endpoints
    pub token: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Base URLs of the crawled publisher sites
#[derive(Debug, Clone, Deserialize)]
pub struct SiteUrls {
    pub acm: String,
    pub mdpi: String,
    pub springer: String,
}

/// Crawl pacing and traversal settings
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// Delay after every processed item (milliseconds)
    #[serde(rename = "item-delay-ms", default = "default_item_delay")]
    pub item_delay_ms: u64,

    /// Upper bound for a single page navigation (seconds)
    #[serde(rename = "navigation-timeout-secs", default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// How long to wait for an expected element to appear (seconds)
    #[serde(rename = "selector-timeout-secs", default = "default_selector_timeout")]
    pub selector_timeout_secs: u64,

    /// Volumes published before this year are ignored
    #[serde(rename = "min-year", default = "default_min_year")]
    pub min_year: i32,

    /// Maximum number of publication updates sent per catalog request
    #[serde(rename = "update-batch-size", default = "default_batch_size")]
    pub update_batch_size: usize,

    /// Pause after each infinite-scroll step (milliseconds)
    #[serde(rename = "scroll-settle-ms", default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,
}

/// Headless browser settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(default)]
    pub executable: Option<String>,
}

/// Process-level retry envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(rename = "delay-ms", default = "default_retry_delay")]
    pub delay_ms: u64,
}

impl CrawlSettings {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            item_delay_ms: default_item_delay(),
            navigation_timeout_secs: default_navigation_timeout(),
            selector_timeout_secs: default_selector_timeout(),
            min_year: default_min_year(),
            update_batch_size: default_batch_size(),
            scroll_settle_ms: default_scroll_settle(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            user_agent: default_user_agent(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            executable: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_retry_delay(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_item_delay() -> u64 {
    2000
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_selector_timeout() -> u64 {
    30
}

fn default_min_year() -> i32 {
    2010
}

fn default_batch_size() -> usize {
    50
}

fn default_scroll_settle() -> u64 {
    5000
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_window_width() -> u32 {
    1366
}

fn default_window_height() -> u32 {
    768
}

fn default_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1000
}
