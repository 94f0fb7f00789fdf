//! Data model shared by extraction, diffing and the catalog client
//!
//! Entities mirror the catalog's schema: publication → volume → issue →
//! article. They live in memory for one run only; the catalog owns them.

mod article;
mod cursor;
pub mod de;
mod publication;

pub use article::{Article, ArticleRef, Author, Keyword};
pub use cursor::{IssueCursor, RecentPublication};
pub use publication::{
    merge_volumes, sort_issues_by_month, sort_volumes, Issue, NewPublication, Publication,
    PublicationUpdate, Publisher, Volume, JOURNAL,
};

use std::cmp::Ordering;

/// Compares two natural keys (volume numbers, issue names, months)
///
/// Keys are ordered by their leading integer, so a composite issue name such
/// as "5-6" or "3-4 Special Issue" sorts as 5 or 3. Keys with a leading
/// number come before keys without one; two keys without one compare as text.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use catalog_crawler::model::compare_keys;
///
/// assert_eq!(compare_keys("9", "10"), Ordering::Less);
/// assert_eq!(compare_keys("5-6", "10"), Ordering::Less);
/// assert_eq!(compare_keys("b", "a"), Ordering::Greater);
/// ```
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.trim().cmp(b.trim()),
    }
}

/// The integer formed by the leading digits of a key, if it starts with one
fn leading_number(key: &str) -> Option<u64> {
    let key = key.trim_start();
    let end = key
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(key.len());
    key[..end].parse().ok()
}

/// Sort key for `month_published` values: numeric months first, the rest last
pub(crate) fn month_key(month: &str) -> (u8, u32) {
    match month.trim().parse::<u32>() {
        Ok(m) => (0, m),
        Err(_) => (1, 0),
    }
}
