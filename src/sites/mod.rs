//! Publisher sites
//!
//! Every site implements the same extraction capability (`SiteAdapter`) and
//! provides the orchestrators behind its crawl tasks. Adapters only read the
//! page they are handed; navigation belongs to the orchestrators.

pub mod acm;
mod dates;
pub mod html;
pub mod mdpi;
pub mod springer;

pub use dates::{format_date, last_year, month_number, month_published};

use crate::browser::Page;
use crate::config::Config;
use crate::crawler::{Outcome, RunState};
use crate::model::{Article, Issue, NewPublication, Publisher, Volume};
use crate::sites::html::cached_regex;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A crawled publisher site; `as_str` is the catalog's scraper id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Acm,
    Mdpi,
    Springer,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::Acm, Site::Mdpi, Site::Springer];

    pub fn as_str(self) -> &'static str {
        match self {
            Site::Acm => "acm",
            Site::Mdpi => "mdpi",
            Site::Springer => "springer",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction capability shared by all sites
///
/// All methods operate on the page as currently loaded and never navigate.
/// Listing extractors return an empty list when nothing matches; only a
/// broken browsing context is an error.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn site(&self) -> Site;

    /// Dismisses the cookie-consent dialog, best effort
    async fn handle_cookie_dialog(&self, page: &dyn Page, state: &RunState);

    /// Publications listed on a journal index page
    async fn extract_publications(&self, page: &dyn Page) -> crate::Result<Vec<NewPublication>>;

    /// Volumes published since the configured minimum year, sorted by number
    async fn extract_volumes_and_issues(&self, page: &dyn Page) -> crate::Result<Vec<Volume>>;

    /// Issues listed on the page, sorted by month
    async fn extract_issues(&self, page: &dyn Page) -> crate::Result<Vec<Issue>>;

    /// Article links of an issue page, optionally limited to ids `>= min_id`
    async fn extract_article_urls(&self, page: &dyn Page, min_id: Option<u64>) -> crate::Result<Vec<String>>;

    /// The article on the page, or why there is none
    async fn extract_article(&self, page: &dyn Page, url: &str) -> Outcome<Article>;
}

/// Lookup table of site adapters keyed by site
#[derive(Default)]
pub struct SiteRegistry {
    adapters: HashMap<Site, Box<dyn SiteAdapter>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the three built-in adapters
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(acm::AcmAdapter::new(&config.crawl)));
        registry.register(Box::new(mdpi::MdpiAdapter::new(&config.crawl)));
        registry.register(Box::new(springer::SpringerAdapter::new(
            &config.sites.springer,
            &config.crawl,
        )));
        registry
    }

    /// Adds an adapter, replacing any previous one for the same site
    pub fn register(&mut self, adapter: Box<dyn SiteAdapter>) {
        self.adapters.insert(adapter.site(), adapter);
    }

    pub fn get(&self, site: Site) -> Option<&dyn SiteAdapter> {
        self.adapters.get(&site).map(|adapter| adapter.as_ref())
    }
}

/// Publisher brands named in a journal title
///
/// All-caps words of two or more letters, in order of appearance, without
/// duplicates. "AI" is a subject, not a publisher, and is ignored.
///
/// # Examples
///
/// ```
/// use catalog_crawler::sites::title_acronyms;
///
/// assert_eq!(title_acronyms("IEEE/ACM Transactions on AI"), vec!["IEEE", "ACM"]);
/// assert!(title_acronyms("Journal of Data").is_empty());
/// ```
pub fn title_acronyms(title: &str) -> Vec<String> {
    static ACRONYM: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(regex) = cached_regex(&ACRONYM, r"\b[A-Z]{2,}\b") else {
        return Vec::new();
    };

    let mut acronyms: Vec<String> = Vec::new();
    for found in regex.find_iter(title) {
        let word = found.as_str();
        if word != "AI" && !acronyms.iter().any(|known| known == word) {
            acronyms.push(word.to_string());
        }
    }
    acronyms
}

/// Publishers for a title: its acronyms, `always` first when given, or
/// `fallback` when the title names none
pub(crate) fn derive_publishers(title: &str, site: Site, always: Option<&str>, fallback: &str) -> Vec<Publisher> {
    let mut names: Vec<String> = always.map(str::to_string).into_iter().collect();
    for acronym in title_acronyms(title) {
        if !names.contains(&acronym) {
            names.push(acronym);
        }
    }
    if names.is_empty() {
        names.push(fallback.to_string());
    }

    names
        .into_iter()
        .map(|name| Publisher::new(name, site.as_str()))
        .collect()
}
