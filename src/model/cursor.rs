use crate::model::article::ArticleRef;
use crate::model::publication::{Issue, Publication, Volume};
use crate::model::de;
use crate::url::trailing_id;
use serde::Deserialize;

/// One entry of the catalog's "recent" bundle for a site
///
/// Marks the last successfully ingested volume, issue and article of a
/// publication. Everything at or before the cursor is already persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentPublication {
    #[serde(flatten)]
    pub publication: Publication,

    #[serde(default)]
    pub recent_volume: Option<Volume>,

    #[serde(default)]
    pub recent_issue: Option<IssueCursor>,

    #[serde(default, deserialize_with = "de::opt_link")]
    pub recent_article: Option<String>,
}

/// The remembered issue plus the links of the articles already stored in it
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCursor {
    #[serde(deserialize_with = "de::string_or_number")]
    pub name: String,

    #[serde(default, deserialize_with = "de::string_or_number")]
    pub month_published: String,

    #[serde(default)]
    pub articles: Vec<ArticleRef>,
}

impl IssueCursor {
    /// The cursor as a bare issue, for re-inclusion in a diff
    pub fn to_issue(&self) -> Issue {
        Issue::new(self.name.clone(), self.month_published.clone())
    }

    pub fn known_links(&self) -> impl Iterator<Item = &str> {
        self.articles.iter().map(|a| a.link.as_str())
    }
}

impl RecentPublication {
    /// First article id not yet ingested, derived from the recent article link
    ///
    /// `None` when there is no article cursor or its link carries no numeric id.
    pub fn next_article_id(&self) -> Option<u64> {
        self.recent_article
            .as_deref()
            .and_then(trailing_id)
            .map(|id| id + 1)
    }
}
