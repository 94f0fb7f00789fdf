//! Run-scoped context shared by the orchestrators of one task

use crate::browser::{navigate_to_page, Page};
use crate::catalog::Catalog;
use crate::config::{Config, CrawlSettings, SiteUrls};
use crate::crawler::process_items;
use crate::sites::{Site, SiteAdapter, SiteRegistry};
use crate::CrawlError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mutable state that lives exactly as long as one run
#[derive(Debug, Default)]
pub struct RunState {
    cookie_dialog_handled: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a latched cookie dialog has been dismissed in this run
    pub fn cookie_dialog_handled(&self) -> bool {
        self.cookie_dialog_handled.load(Ordering::Relaxed)
    }

    pub fn mark_cookie_dialog_handled(&self) {
        self.cookie_dialog_handled.store(true, Ordering::Relaxed);
    }
}

/// Everything an orchestrator needs: the page, the catalog, settings,
/// the site adapters and the run state
pub struct TaskContext<'a> {
    page: &'a dyn Page,
    catalog: &'a dyn Catalog,
    config: &'a Config,
    adapters: SiteRegistry,
    state: RunState,
}

impl<'a> TaskContext<'a> {
    pub fn new(page: &'a dyn Page, catalog: &'a dyn Catalog, config: &'a Config) -> Self {
        Self {
            page,
            catalog,
            config,
            adapters: SiteRegistry::from_config(config),
            state: RunState::new(),
        }
    }

    pub fn page(&self) -> &'a dyn Page {
        self.page
    }

    pub fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    pub fn settings(&self) -> &'a CrawlSettings {
        &self.config.crawl
    }

    pub fn sites(&self) -> &'a SiteUrls {
        &self.config.sites
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The extraction adapter registered for `site`
    pub fn adapter(&self, site: Site) -> crate::Result<&dyn SiteAdapter> {
        self.adapters
            .get(site)
            .ok_or_else(|| CrawlError::NoAdapter(site.to_string()))
    }

    /// Navigates to `url` and dismisses the site's cookie dialog
    ///
    /// Returns `false` when the page could not be loaded; the caller must
    /// then skip extraction for this URL.
    pub async fn open(&self, site: Site, url: &str) -> crate::Result<bool> {
        if !navigate_to_page(self.page, url, self.settings().navigation_timeout()).await {
            return Ok(false);
        }
        self.adapter(site)?
            .handle_cookie_dialog(self.page, &self.state)
            .await;
        Ok(true)
    }

    /// The fixed politeness pause between two items
    pub async fn pause(&self) {
        tokio::time::sleep(self.settings().item_delay()).await;
    }

    /// `process_items` with the configured item delay
    pub async fn process<I, T, R, F, Fut>(&self, items: I, f: F) -> crate::Result<Vec<R>>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = crate::Result<Option<R>>>,
    {
        process_items(items, self.settings().item_delay(), f).await
    }
}
