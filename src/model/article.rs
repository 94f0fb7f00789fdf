use serde::{Deserialize, Serialize};

/// An article within an issue; `link` is its natural key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,

    /// Publication date formatted as `dd-mm-yyyy`
    pub published_date: Option<String>,

    pub link: String,
    pub doi: Option<String>,
    pub pdf_link: Option<String>,

    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

/// Article author, denormalized per article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub university: Option<String>,
    pub profile_link: Option<String>,
    pub orcid_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
}

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A reference to an already-stored article, as carried by resume cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub link: String,
}
