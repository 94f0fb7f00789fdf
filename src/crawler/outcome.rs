use crate::CrawlError;
use std::fmt;

/// Why an extraction produced nothing without failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A field the catalog requires is absent from the page
    MissingField(&'static str),

    /// The entry's type is filtered out (editorials, front matter)
    FilteredType(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing {}", field),
            SkipReason::FilteredType(kind) => write!(f, "filtered type '{}'", kind),
        }
    }
}

/// Result of extracting one entity from a loaded page
///
/// `NotFound` means the publisher reports the entity as gone, which callers
/// must not confuse with a transient `Skip`.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Skip(SkipReason),
    NotFound,
    Failure(CrawlError),
}

impl<T> Outcome<T> {
    /// The extracted value, if any
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the outcome into a runner item
    ///
    /// Skips and not-found pages are logged and dropped; failures propagate.
    pub fn into_item(self, link: &str) -> crate::Result<Option<T>> {
        match self {
            Outcome::Success(value) => Ok(Some(value)),
            Outcome::Skip(reason) => {
                tracing::warn!("Skipping {}: {}", link, reason);
                Ok(None)
            }
            Outcome::NotFound => {
                tracing::warn!("Not found: {}", link);
                Ok(None)
            }
            Outcome::Failure(error) => Err(error),
        }
    }
}
