use crate::model::article::Article;
use crate::model::{compare_keys, de, month_key};
use serde::{Deserialize, Serialize};

/// Publication kind recorded for every crawled journal
pub const JOURNAL: &str = "Journal";

/// A publisher brand, pinned to the site adapter that discovered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,

    /// Site identifier of the adapter that discovered this publisher
    #[serde(rename = "scraper")]
    pub scraper_id: String,
}

impl Publisher {
    pub fn new(name: impl Into<String>, scraper_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scraper_id: scraper_id.into(),
        }
    }
}

/// A publication as known to the catalog
///
/// `year_published == None` means "not yet determined", which sends ACM
/// publications down the start-year discovery path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,

    #[serde(default)]
    pub title: String,

    pub link: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "de::opt_year")]
    pub year_published: Option<i32>,

    #[serde(default)]
    pub issn: Option<String>,
}

/// A publication freshly extracted from a listing page, not yet stored
///
/// Identified only by `link` until the catalog assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPublication {
    pub publishers: Vec<Publisher>,
    pub title: String,
    pub link: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
}

/// Partial publication sent to the update endpoint: id plus changed fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicationUpdate {
    pub id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
}

impl PublicationUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// True when nothing besides the id would be sent
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.year_published.is_none()
            && self.issn.is_none()
            && self.volumes.is_none()
    }
}

/// A volume of a publication; `number` is unique within the publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(deserialize_with = "de::string_or_number")]
    pub number: String,

    #[serde(default, deserialize_with = "de::opt_year")]
    pub year_published: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl Volume {
    pub fn new(number: impl Into<String>, year_published: Option<i32>) -> Self {
        Self {
            number: number.into(),
            year_published,
            issues: Vec::new(),
        }
    }

    /// Sorts issues by `month_published` ascending (stable for equal months)
    pub fn sort_issues_by_month(&mut self) {
        sort_issues_by_month(&mut self.issues);
    }
}

/// An issue of a volume; `name` is a site-local label, not always numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(deserialize_with = "de::string_or_number")]
    pub name: String,

    #[serde(default, deserialize_with = "de::string_or_number")]
    pub month_published: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub articles: Vec<Article>,
}

impl Issue {
    pub fn new(name: impl Into<String>, month_published: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            month_published: month_published.into(),
            articles: Vec::new(),
        }
    }

    /// An issue is usable only when both its label and month are known
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.month_published.is_empty()
    }
}

/// Sorts issues by month ascending, unparsable months last
pub fn sort_issues_by_month(issues: &mut [Issue]) {
    issues.sort_by_key(|issue| month_key(&issue.month_published));
}

/// Sorts volumes by number using natural key ordering
pub fn sort_volumes(volumes: &mut [Volume]) {
    volumes.sort_by(|a, b| compare_keys(&a.number, &b.number));
}

/// Merges two volume lists, unioning the issues of volumes with equal numbers
///
/// Volumes keep first-seen order; incoming issues are appended after the
/// existing ones of the same volume.
///
/// # Example
///
/// ```
/// use catalog_crawler::model::{merge_volumes, Issue, Volume};
///
/// let mut v1 = Volume::new("4", Some(2012));
/// v1.issues.push(Issue::new("1", "3"));
/// let mut v1_again = Volume::new("4", Some(2012));
/// v1_again.issues.push(Issue::new("2", "6"));
///
/// let merged = merge_volumes(vec![v1], vec![v1_again, Volume::new("5", Some(2013))]);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].issues.len(), 2);
/// ```
pub fn merge_volumes(existing: Vec<Volume>, incoming: Vec<Volume>) -> Vec<Volume> {
    let mut merged = existing;
    for volume in incoming {
        match merged.iter_mut().find(|v| v.number == volume.number) {
            Some(known) => known.issues.extend(volume.issues),
            None => merged.push(volume),
        }
    }
    merged
}
