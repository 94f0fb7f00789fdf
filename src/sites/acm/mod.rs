//! ACM Digital Library
//!
//! Journals are listed on an infinitely scrolling index. Volumes and issues
//! come from the per-year list-of-issues pages, articles from the issue
//! tables of contents.

pub mod extract;
mod tasks;

pub use tasks::{articles_list, journals_list, publications, volumes_issues};

use crate::browser::{wait_for_selector, Page};
use crate::config::CrawlSettings;
use crate::crawler::{filter_by_min_id, Outcome, RunState};
use crate::model::{sort_issues_by_month, sort_volumes, Article, Issue, NewPublication, Volume};
use crate::sites::html::snapshot;
use crate::sites::{Site, SiteAdapter};
use async_trait::async_trait;
use std::time::Duration;

const COOKIE_DIALOG: &str = "#CybotCookiebotDialogBody";
const COOKIE_ALLOW_ALL: &str = "#CybotCookiebotDialogBodyLevelButtonLevelOptinAllowallSelection";
const COOKIE_DIALOG_WAIT: Duration = Duration::from_secs(3);
const COOKIE_DIALOG_SETTLE: Duration = Duration::from_secs(2);

pub struct AcmAdapter {
    min_year: i32,
    selector_timeout: Duration,
}

impl AcmAdapter {
    pub fn new(settings: &CrawlSettings) -> Self {
        Self {
            min_year: settings.min_year,
            selector_timeout: settings.selector_timeout(),
        }
    }
}

#[async_trait]
impl SiteAdapter for AcmAdapter {
    fn site(&self) -> Site {
        Site::Acm
    }

    /// Accepts the Cookiebot dialog when it shows up within a few seconds
    async fn handle_cookie_dialog(&self, page: &dyn Page, _state: &RunState) {
        let wait = self.selector_timeout.min(COOKIE_DIALOG_WAIT);
        if !wait_for_selector(page, COOKIE_DIALOG, wait).await {
            return;
        }

        match page.click(COOKIE_ALLOW_ALL).await {
            Ok(()) => {
                tracing::debug!("Cookie dialog accepted");
                tokio::time::sleep(COOKIE_DIALOG_SETTLE).await;
            }
            Err(e) => tracing::warn!("Could not dismiss cookie dialog: {}", e),
        }
    }

    async fn extract_publications(&self, page: &dyn Page) -> crate::Result<Vec<NewPublication>> {
        if !wait_for_selector(page, ".search__item", self.selector_timeout).await {
            tracing::warn!("No journals listed on the index page");
            return Ok(Vec::new());
        }
        let snapshot = snapshot(page).await?;
        Ok(extract::parse_publications(&snapshot))
    }

    async fn extract_volumes_and_issues(&self, page: &dyn Page) -> crate::Result<Vec<Volume>> {
        wait_for_selector(page, ".loi__vol-title.left-bordered-title", self.selector_timeout).await;
        let snapshot = snapshot(page).await?;

        let mut volumes: Vec<Volume> = extract::parse_volumes(&snapshot)
            .into_iter()
            .filter(|volume| volume.year_published.map_or(false, |year| year >= self.min_year))
            .collect();
        for volume in &mut volumes {
            volume.sort_issues_by_month();
        }
        sort_volumes(&mut volumes);
        Ok(volumes)
    }

    async fn extract_issues(&self, page: &dyn Page) -> crate::Result<Vec<Issue>> {
        let mut issues: Vec<Issue> = self
            .extract_volumes_and_issues(page)
            .await?
            .into_iter()
            .flat_map(|volume| volume.issues)
            .collect();
        sort_issues_by_month(&mut issues);
        Ok(issues)
    }

    async fn extract_article_urls(&self, page: &dyn Page, min_id: Option<u64>) -> crate::Result<Vec<String>> {
        let snapshot = snapshot(page).await?;
        Ok(filter_by_min_id(extract::parse_article_urls(&snapshot), min_id))
    }

    async fn extract_article(&self, page: &dyn Page, url: &str) -> Outcome<Article> {
        match snapshot(page).await {
            Ok(snapshot) => extract::parse_article(&snapshot, url),
            Err(e) => Outcome::Failure(e),
        }
    }
}
