//! Browser capability used by the crawler
//!
//! This module contains:
//! - The `Page` trait: a single browsing context that can navigate, expose
//!   its serialized DOM, probe and click elements, and evaluate scripts
//! - A Chrome implementation driven over the DevTools protocol
//! - `StaticPage`, an offline implementation serving pre-loaded documents
//! - The page navigator, which turns navigation failures into a skip signal

mod chrome;
mod static_page;

pub use chrome::{ChromePage, ChromeSession};
pub use static_page::StaticPage;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browsing context
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("DevTools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("No element matches selector: {0}")]
    ElementNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("No document loaded")]
    NoDocument,
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A single browsing context, reused sequentially for a whole run
#[async_trait]
pub trait Page: Send + Sync {
    /// Loads a URL and waits for the navigation to settle
    async fn goto(&self, url: &str) -> BrowserResult<()>;

    /// The URL of the currently loaded document
    async fn current_url(&self) -> BrowserResult<Option<String>>;

    /// The serialized DOM of the currently loaded document
    async fn content(&self) -> BrowserResult<String>;

    /// True when at least one element matches the selector right now
    async fn exists(&self, selector: &str) -> BrowserResult<bool>;

    /// Clicks the first element matching the selector
    async fn click(&self, selector: &str) -> BrowserResult<()>;

    /// Evaluates a script against the loaded document
    async fn evaluate(&self, script: &str) -> BrowserResult<Value>;
}

/// Interval between two probes while waiting for a selector
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Waits until an element matching `selector` exists, up to `timeout`
///
/// Returns `false` on timeout. Probe errors count as "not there yet".
pub async fn wait_for_selector(page: &dyn Page, selector: &str, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if matches!(page.exists(selector).await, Ok(true)) {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::debug!("Timed out waiting for selector {}", selector);
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Attempts to load `url`, bounded by `timeout`
///
/// Never fails: navigation errors and timeouts are logged and reported as
/// `false`. Callers must skip the page on `false` without concluding that the
/// entity no longer exists.
pub async fn navigate_to_page(page: &dyn Page, url: &str, timeout: Duration) -> bool {
    tracing::info!("Navigating to: {}", url);

    match tokio::time::timeout(timeout, page.goto(url)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!("Error navigating to {}: {}", url, e);
            false
        }
        Err(_) => {
            let error = BrowserError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            };
            tracing::error!("Error navigating to {}: {}", url, error);
            false
        }
    }
}
