//! Offline browsing context
//!
//! Serves pre-loaded HTML documents keyed by URL. Clicking a selector with a
//! registered transition swaps in the follow-up document, which is enough to
//! replay "show more" style pagination. Navigation failures and hangs can be
//! injected per URL.

use crate::browser::{BrowserError, BrowserResult, Page};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct StaticPage {
    documents: HashMap<String, String>,
    failures: HashSet<String>,
    hangs: HashSet<String>,
    transitions: HashMap<String, String>,
    scripts: HashMap<String, Value>,
    current: Mutex<Option<(String, String)>>,
    visits: Mutex<Vec<String>>,
    clicks: Mutex<Vec<String>>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the document served for `url`
    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }

    /// Makes navigation to `url` fail with a navigation error
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failures.insert(url.into());
        self
    }

    /// Makes navigation to `url` never complete
    pub fn with_hang(mut self, url: impl Into<String>) -> Self {
        self.hangs.insert(url.into());
        self
    }

    /// After clicking `selector`, the current document becomes `html`
    pub fn with_click(mut self, selector: impl Into<String>, html: impl Into<String>) -> Self {
        self.transitions.insert(selector.into(), html.into());
        self
    }

    /// Fixed result for a script passed to `evaluate`
    pub fn with_script(mut self, script: impl Into<String>, value: Value) -> Self {
        self.scripts.insert(script.into(), value);
        self
    }

    /// Every URL passed to `goto`, in order, including failed ones
    pub fn visits(&self) -> Vec<String> {
        lock(&self.visits).clone()
    }

    /// Every selector successfully clicked, in order
    pub fn clicks(&self) -> Vec<String> {
        lock(&self.clicks).clone()
    }

    fn current_html(&self) -> BrowserResult<String> {
        lock(&self.current)
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or(BrowserError::NoDocument)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn matches_any(html: &str, selector: &str) -> BrowserResult<bool> {
    let selector = Selector::parse(selector)
        .map_err(|e| BrowserError::InvalidSelector(format!("{}: {:?}", selector, e)))?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

#[async_trait]
impl Page for StaticPage {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        lock(&self.visits).push(url.to_string());

        if self.hangs.contains(url) {
            std::future::pending::<()>().await;
        }

        if self.failures.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }

        let html = self
            .documents
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })?;

        *lock(&self.current) = Some((url.to_string(), html));
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(lock(&self.current).as_ref().map(|(url, _)| url.clone()))
    }

    async fn content(&self) -> BrowserResult<String> {
        self.current_html()
    }

    async fn exists(&self, selector: &str) -> BrowserResult<bool> {
        let html = self.current_html()?;
        matches_any(&html, selector)
    }

    async fn click(&self, selector: &str) -> BrowserResult<()> {
        let html = self.current_html()?;
        if !matches_any(&html, selector)? {
            return Err(BrowserError::ElementNotFound(selector.to_string()));
        }

        lock(&self.clicks).push(selector.to_string());
        if let Some(next) = self.transitions.get(selector) {
            if let Some((_, current)) = lock(&self.current).as_mut() {
                *current = next.clone();
            }
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<Value> {
        Ok(self.scripts.get(script).cloned().unwrap_or(Value::Null))
    }
}
