//! The catalog capability consumed by the orchestrators

use crate::model::{Article, Issue, NewPublication, Publication, PublicationUpdate, RecentPublication, Volume};
use crate::sites::Site;
use async_trait::async_trait;

/// Typed access to the remote catalog
///
/// Implementations never return errors. The failure policy differs per
/// operation and callers rely on it:
///
/// | Operation | On failure |
/// |-----------|------------|
/// | `get_publications`, `get_recent` | `None`; the orchestrator stops early |
/// | `get_volumes` | empty list |
/// | `get_issues` | `None`, kept distinct from "no issues" |
/// | writes | logged, batch dropped for this run |
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Publications already registered for a site
    async fn get_publications(&self, site: Site) -> Option<Vec<Publication>>;

    /// Publications of a site with their resume cursors
    async fn get_recent(&self, site: Site) -> Option<Vec<RecentPublication>>;

    /// Stored volumes of a publication
    async fn get_volumes(&self, publication_id: i64) -> Vec<Volume>;

    /// Stored issues of one volume
    async fn get_issues(&self, publication_id: i64, volume: &str) -> Option<Vec<Issue>>;

    /// Creates publications (upsert keyed by link)
    async fn store_publications(&self, publications: &[NewPublication]);

    /// Sends partial updates (id plus changed fields)
    async fn update_publications(&self, updates: &[PublicationUpdate]);

    /// Attaches articles to an issue
    async fn store_articles(&self, articles: &[Article], publication_id: i64, volume: &str, issue: &str);
}
