//! Incremental-diff engine
//!
//! Update runs only revisit what is at or after the catalog's cursor. The
//! same rule applies at every level: volumes by number, issues by month or
//! name, articles by the numeric id at the end of their link.

use crate::model::compare_keys;
use crate::url::trailing_id;
use std::cmp::Ordering;

/// Keeps the observed children ordered at or after the cursor
///
/// Without a cursor every observed child is new. With one, strictly earlier
/// children are dropped and the cursor's own entity is always part of the
/// result: it may have gained children since the last run. When the cursor
/// is not among the observed children it is put back in front.
///
/// # Example
///
/// ```
/// use catalog_crawler::crawler::diff_from_cursor;
///
/// let observed = vec!["1", "2", "3", "4", "5"];
/// assert_eq!(diff_from_cursor(observed.clone(), Some("3"), |v| *v), vec!["3", "4", "5"]);
/// assert_eq!(diff_from_cursor(observed, None, |v| *v), vec!["1", "2", "3", "4", "5"]);
/// ```
pub fn diff_from_cursor<T, K>(observed: Vec<T>, cursor: Option<T>, key: K) -> Vec<T>
where
    K: Fn(&T) -> &str,
{
    let Some(cursor) = cursor else {
        return observed;
    };

    let mut cursor_seen = false;
    let mut kept: Vec<T> = observed
        .into_iter()
        .filter(|item| match compare_keys(key(item), key(&cursor)) {
            Ordering::Less => false,
            Ordering::Equal => {
                cursor_seen = true;
                true
            }
            Ordering::Greater => true,
        })
        .collect();

    if !cursor_seen {
        kept.insert(0, cursor);
    }
    kept
}

/// Keeps article links whose trailing id is at least `min_id`, sorted by id
///
/// Links without a numeric id cannot be placed relative to the floor and are
/// dropped once a floor is set. Without a floor the links are returned
/// unchanged.
pub fn filter_by_min_id(links: Vec<String>, min_id: Option<u64>) -> Vec<String> {
    let Some(min_id) = min_id else {
        return links;
    };

    let mut numbered: Vec<(u64, String)> = links
        .into_iter()
        .filter_map(|link| trailing_id(&link).map(|id| (id, link)))
        .filter(|(id, _)| *id >= min_id)
        .collect();
    numbered.sort_by_key(|(id, _)| *id);
    numbered.into_iter().map(|(_, link)| link).collect()
}

/// Drops links already recorded under the cursor issue
pub fn exclude_known<'a>(links: Vec<String>, known: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let known: std::collections::HashSet<&str> = known.into_iter().collect();
    links
        .into_iter()
        .filter(|link| !known.contains(link.as_str()))
        .collect()
}
