//! Springer Link
//!
//! Journals come from the paginated computer-science subject browser; only
//! journals hosted on Springer Link itself are crawled further. A journal's
//! volumes and issues share one page, articles are listed per issue.

pub mod extract;
mod tasks;

pub use tasks::{articles_list, journals_list, publications_volumes_issues, update};

use crate::browser::{wait_for_selector, Page};
use crate::config::CrawlSettings;
use crate::crawler::{filter_by_min_id, Outcome, RunState};
use crate::model::{sort_issues_by_month, sort_volumes, Article, Issue, NewPublication, Volume};
use crate::sites::html::snapshot;
use crate::sites::{Site, SiteAdapter};
use crate::url::domain_allowed;
use async_trait::async_trait;
use std::time::Duration;

const COOKIE_BANNER: &str = ".cc-banner__content";
const COOKIE_REJECT: &str = ".cc-banner__button-reject";
const COOKIE_BANNER_WAIT: Duration = Duration::from_secs(5);

/// Hosts whose journals are stored from the subject browser
pub const LISTED_DOMAINS: [&str; 3] = ["link.springer.com", "www.springer.com", "*.springeropen.com"];

/// Hosts whose journal pages follow the volumes-and-issues layout
pub const CRAWLED_DOMAINS: [&str; 2] = ["link.springer.com", "www.springer.com"];

pub struct SpringerAdapter {
    base_url: String,
    min_year: i32,
    selector_timeout: Duration,
}

impl SpringerAdapter {
    pub fn new(base_url: &str, settings: &CrawlSettings) -> Self {
        Self {
            base_url: base_url.to_string(),
            min_year: settings.min_year,
            selector_timeout: settings.selector_timeout(),
        }
    }
}

#[async_trait]
impl SiteAdapter for SpringerAdapter {
    fn site(&self) -> Site {
        Site::Springer
    }

    /// Rejects the consent banner once per run
    async fn handle_cookie_dialog(&self, page: &dyn Page, state: &RunState) {
        if state.cookie_dialog_handled() {
            return;
        }
        let wait = self.selector_timeout.min(COOKIE_BANNER_WAIT);
        if !wait_for_selector(page, COOKIE_BANNER, wait).await {
            return;
        }

        match page.click(COOKIE_REJECT).await {
            Ok(()) => {
                tracing::debug!("Cookie banner rejected");
                state.mark_cookie_dialog_handled();
            }
            Err(e) => tracing::warn!("Could not dismiss cookie banner: {}", e),
        }
    }

    async fn extract_publications(&self, page: &dyn Page) -> crate::Result<Vec<NewPublication>> {
        let snapshot = snapshot(page).await?;
        let publications = extract::parse_publications(&snapshot)
            .into_iter()
            .filter(|publication| domain_allowed(&publication.link, &LISTED_DOMAINS))
            .collect();
        Ok(publications)
    }

    async fn extract_volumes_and_issues(&self, page: &dyn Page) -> crate::Result<Vec<Volume>> {
        wait_for_selector(page, r#"[data-test="volumes-and-issues"]"#, self.selector_timeout).await;
        let snapshot = snapshot(page).await?;

        let mut volumes: Vec<Volume> = extract::parse_volumes(&snapshot)
            .into_iter()
            .filter(|volume| volume.year_published.map_or(false, |year| year >= self.min_year))
            .collect();
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
            Ok(snapshot) => extract::parse_article(&snapshot, url, &self.base_url),
            Err(e) => Outcome::Failure(e),
        }
    }
}
