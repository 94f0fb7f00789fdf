//! MDPI
//!
//! Journals come from the computer-science subject table. Volumes are read
//! from each journal's side menu, issues from the volume pages, articles
//! from the issue pages.

pub mod extract;
mod tasks;

pub use tasks::{articles, issues, journals_list, publications_volumes, update};

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

pub struct MdpiAdapter {
    min_year: i32,
    selector_timeout: Duration,
}

impl MdpiAdapter {
    pub fn new(settings: &CrawlSettings) -> Self {
        Self {
            min_year: settings.min_year,
            selector_timeout: settings.selector_timeout(),
        }
    }
}

#[async_trait]
impl SiteAdapter for MdpiAdapter {
    fn site(&self) -> Site {
        Site::Mdpi
    }

    /// The consent banner rarely blocks MDPI pages, so it is only probed
    async fn handle_cookie_dialog(&self, page: &dyn Page, _state: &RunState) {
        if !matches!(page.exists(COOKIE_DIALOG).await, Ok(true)) {
            return;
        }
        if let Err(e) = page.click(COOKIE_ALLOW_ALL).await {
            tracing::debug!("Could not dismiss cookie dialog: {}", e);
        }
    }

    async fn extract_publications(&self, page: &dyn Page) -> crate::Result<Vec<NewPublication>> {
        let snapshot = snapshot(page).await?;
        Ok(extract::parse_publications(&snapshot))
    }

    async fn extract_volumes_and_issues(&self, page: &dyn Page) -> crate::Result<Vec<Volume>> {
        let snapshot = snapshot(page).await?;
        let mut volumes: Vec<Volume> = extract::parse_volumes(&snapshot)
            .into_iter()
            .filter(|volume| volume.year_published.map_or(false, |year| year >= self.min_year))
            .collect();
        sort_volumes(&mut volumes);
        Ok(volumes)
    }

    async fn extract_issues(&self, page: &dyn Page) -> crate::Result<Vec<Issue>> {
        if !wait_for_selector(page, ".middle-column__main .content__container", self.selector_timeout).await {
            tracing::warn!("Volume page has no content");
            return Ok(Vec::new());
        }
        let snapshot = snapshot(page).await?;
        let mut issues = extract::parse_issues(&snapshot);
        sort_issues_by_month(&mut issues);
        Ok(issues)
    }

    /// Links are always filtered by id, from 1 when no floor is given
    async fn extract_article_urls(&self, page: &dyn Page, min_id: Option<u64>) -> crate::Result<Vec<String>> {
        let snapshot = snapshot(page).await?;
        let links = extract::parse_article_urls(&snapshot);
        Ok(filter_by_min_id(links, Some(min_id.unwrap_or(1))))
    }

    async fn extract_article(&self, page: &dyn Page, url: &str) -> Outcome<Article> {
        match snapshot(page).await {
            Ok(snapshot) => extract::parse_article(&snapshot, url),
            Err(e) => Outcome::Failure(e),
        }
    }
}
