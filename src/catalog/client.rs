//! HTTP implementation of the catalog capability
//!
//! This module handles all requests to the remote catalog API, including:
//! - Building the HTTP client with a descriptive user agent
//! - Bearer authentication on the scraper endpoints
//! - Per-operation failure policy (absent, empty, or logged)

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::model::{Article, Issue, NewPublication, Publication, PublicationUpdate, RecentPublication, Volume};
use crate::sites::Site;
use crate::{ConfigError, CrawlError};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for catalog requests
///
/// # Arguments
///
/// * `config` - Catalog connection settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CatalogConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Envelope used by the issues endpoint
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

/// Catalog client over HTTP+JSON
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl CatalogClient {
    /// Creates a client from the catalog settings
    pub fn new(config: &CatalogConfig) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CrawlError::Config(ConfigError::InvalidUrl(config.base_url.clone())));
        }

        Ok(Self {
            client: build_http_client(config)?,
            base_url,
            token: config.token.clone(),
        })
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, authenticated: bool) -> crate::Result<T> {
        let mut request = self.client.get(url);
        if authenticated {
            request = request.bearer_auth(&self.token);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Sends a write request and logs the server's acknowledgment
    async fn send_write<B: Serialize + ?Sized>(&self, method: Method, url: Url, body: &B, what: &str) {
        let result = async move {
            let response = self
                .client
                .request(method, url)
                .bearer_auth(&self.token)
                .json(body)
                .send()
                .await?;
            let status = response.status();
            let ack: Value = response.json().await.unwrap_or(Value::Null);
            Ok::<_, CrawlError>((status, ack))
        }
        .await;

        match result {
            Ok((status, ack)) if status.is_success() => {
                tracing::info!("Catalog accepted {}: {}", what, ack);
            }
            Ok((status, ack)) => {
                tracing::error!("Catalog rejected {} (status {}): {}", what, status, ack);
            }
            Err(e) => {
                tracing::error!("Error posting {}: {}", what, e);
            }
        }
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn get_publications(&self, site: Site) -> Option<Vec<Publication>> {
        let url = self.endpoint(&["scraper", "publications", site.as_str()]);
        match self.get_json(url, true).await {
            Ok(publications) => Some(publications),
            Err(e) => {
                tracing::error!("Error fetching {} publications: {}", site, e);
                None
            }
        }
    }

    async fn get_recent(&self, site: Site) -> Option<Vec<RecentPublication>> {
        let url = self.endpoint(&["scraper", "recent", site.as_str()]);
        match self.get_json(url, true).await {
            Ok(recent) => Some(recent),
            Err(e) => {
                tracing::error!("Error fetching recent {} publications: {}", site, e);
                None
            }
        }
    }

    async fn get_volumes(&self, publication_id: i64) -> Vec<Volume> {
        let id = publication_id.to_string();
        let url = self.endpoint(&["publications", &id, "volumes"]);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error fetching volumes of publication {}: {}", publication_id, e);
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "Skipping publication with id: {}: no volumes found (status {})",
                publication_id,
                status.as_u16()
            );
            return Vec::new();
        }

        response.json().await.unwrap_or_else(|e| {
            tracing::error!("Invalid volumes payload for publication {}: {}", publication_id, e);
            Vec::new()
        })
    }

    async fn get_issues(&self, publication_id: i64, volume: &str) -> Option<Vec<Issue>> {
        let id = publication_id.to_string();
        let url = self.endpoint(&["publications", &id, volume, "issues"]);

        match self.get_json::<DataEnvelope<Vec<Issue>>>(url, false).await {
            Ok(envelope) => envelope.data,
            Err(CrawlError::Reqwest(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
                tracing::warn!(
                    "No issues stored for publication {} volume {}",
                    publication_id,
                    volume
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    "Error fetching issues of publication {} volume {}: {}",
                    publication_id,
                    volume,
                    e
                );
                None
            }
        }
    }

    async fn store_publications(&self, publications: &[NewPublication]) {
        if publications.is_empty() {
            tracing::debug!("No publications to store");
            return;
        }
        let url = self.endpoint(&["scraper", "publications"]);
        let what = format!("{} publications", publications.len());
        self.send_write(Method::POST, url, publications, &what).await;
    }

    async fn update_publications(&self, updates: &[PublicationUpdate]) {
        if updates.is_empty() {
            tracing::debug!("No publication updates to send");
            return;
        }
        let url = self.endpoint(&["scraper", "publications"]);
        let what = format!("{} publication updates", updates.len());
        self.send_write(Method::PUT, url, updates, &what).await;
    }

    async fn store_articles(&self, articles: &[Article], publication_id: i64, volume: &str, issue: &str) {
        if articles.is_empty() {
            tracing::debug!("No articles to store for {}/{}/{}", publication_id, volume, issue);
            return;
        }
        let id = publication_id.to_string();
        let url = self.endpoint(&["scraper", "publications", &id, volume, issue, "articles"]);
        let what = format!(
            "{} articles for publication {} volume {} issue {}",
            articles.len(),
            publication_id,
            volume,
            issue
        );
        self.send_write(Method::POST, url, articles, &what).await;
    }
}
