//! Shared fixtures: an in-memory catalog and a fast test configuration

use async_trait::async_trait;
use catalog_crawler::catalog::Catalog;
use catalog_crawler::config::{BrowserConfig, CatalogConfig, Config, CrawlSettings, RetryConfig, SiteUrls};
use catalog_crawler::model::{
    Article, Issue, NewPublication, Publication, PublicationUpdate, RecentPublication, Volume, JOURNAL,
};
use catalog_crawler::Site;
use std::collections::HashMap;
use std::sync::Mutex;

pub const ACM: &str = "https://dl.acm.org";
pub const MDPI: &str = "https://www.mdpi.com";
pub const SPRINGER: &str = "https://link.springer.com";

/// Configuration without delays or selector waits
pub fn test_config(catalog_url: &str) -> Config {
    Config {
        catalog: CatalogConfig {
            base_url: catalog_url.to_string(),
            token: "test-token".to_string(),
            request_timeout_secs: 5,
        },
        sites: SiteUrls {
            acm: ACM.to_string(),
            mdpi: MDPI.to_string(),
            springer: SPRINGER.to_string(),
        },
        crawl: CrawlSettings {
            item_delay_ms: 0,
            navigation_timeout_secs: 5,
            selector_timeout_secs: 0,
            min_year: 2010,
            update_batch_size: 2,
            scroll_settle_ms: 0,
        },
        browser: BrowserConfig::default(),
        retry: RetryConfig::default(),
    }
}

pub fn publication(id: i64, link: &str, issn: Option<&str>, year_published: Option<i32>) -> Publication {
    Publication {
        id,
        title: format!("Journal {}", id),
        link: link.to_string(),
        description: None,
        kind: Some(JOURNAL.to_string()),
        year_published,
        issn: issn.map(str::to_string),
    }
}

/// Stored articles of one issue: publication id, volume, issue, articles
pub type StoredArticles = (i64, String, String, Vec<Article>);

/// Catalog serving fixed reads and recording every write
#[derive(Default)]
pub struct RecordingCatalog {
    pub publications: Vec<Publication>,
    pub recent: Vec<RecentPublication>,
    pub volumes: HashMap<i64, Vec<Volume>>,
    pub issues: HashMap<(i64, String), Vec<Issue>>,
    pub stored_publications: Mutex<Vec<NewPublication>>,
    pub update_batches: Mutex<Vec<Vec<PublicationUpdate>>>,
    pub stored_articles: Mutex<Vec<StoredArticles>>,
}

impl RecordingCatalog {
    pub fn stored_publications(&self) -> Vec<NewPublication> {
        self.stored_publications.lock().unwrap().clone()
    }

    pub fn update_batches(&self) -> Vec<Vec<PublicationUpdate>> {
        self.update_batches.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<PublicationUpdate> {
        self.update_batches().into_iter().flatten().collect()
    }

    pub fn stored_articles(&self) -> Vec<StoredArticles> {
        self.stored_articles.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for RecordingCatalog {
    async fn get_publications(&self, _site: Site) -> Option<Vec<Publication>> {
        Some(self.publications.clone())
    }

    async fn get_recent(&self, _site: Site) -> Option<Vec<RecentPublication>> {
        Some(self.recent.clone())
    }

    async fn get_volumes(&self, publication_id: i64) -> Vec<Volume> {
        self.volumes.get(&publication_id).cloned().unwrap_or_default()
    }

    async fn get_issues(&self, publication_id: i64, volume: &str) -> Option<Vec<Issue>> {
        self.issues.get(&(publication_id, volume.to_string())).cloned()
    }

    async fn store_publications(&self, publications: &[NewPublication]) {
        self.stored_publications
            .lock()
            .unwrap()
            .extend_from_slice(publications);
    }

    async fn update_publications(&self, updates: &[PublicationUpdate]) {
        if !updates.is_empty() {
            self.update_batches.lock().unwrap().push(updates.to_vec());
        }
    }

    async fn store_articles(&self, articles: &[Article], publication_id: i64, volume: &str, issue: &str) {
        self.stored_articles.lock().unwrap().push((
            publication_id,
            volume.to_string(),
            issue.to_string(),
            articles.to_vec(),
        ));
    }
}

/// Link set of stored articles, in order
pub fn article_links(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|article| article.link.as_str()).collect()
}
