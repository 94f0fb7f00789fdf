//! URL helpers for Catalog-Crawler
//!
//! Small, allocation-light utilities used when building site URLs from
//! catalog records and when filtering links extracted from pages.

use url::Url;

/// Returns the last non-empty path segment of a URL
///
/// ACM journal links end with the journal code used to build
/// table-of-contents and list-of-issues URLs.
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::last_path_segment;
///
/// assert_eq!(last_path_segment("https://dl.acm.org/journal/tocs"), Some("tocs".to_string()));
/// assert_eq!(last_path_segment("https://dl.acm.org/journal/tocs/"), Some("tocs".to_string()));
/// assert_eq!(last_path_segment("not a url"), None);
/// ```
pub fn last_path_segment(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Extracts the numeric id at the end of an article URL
///
/// MDPI article links end with a monotonically increasing number which
/// serves as the incremental cursor.
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::trailing_id;
///
/// assert_eq!(trailing_id("https://www.mdpi.com/1424-8220/23/4/2101"), Some(2101));
/// assert_eq!(trailing_id("https://www.mdpi.com/1424-8220/23/4/2101/"), Some(2101));
/// assert_eq!(trailing_id("https://link.springer.com/article/10.1007/s10009-023-00712-5"), None);
/// ```
pub fn trailing_id(link: &str) -> Option<u64> {
    let path = link
        .split(['?', '#'])
        .next()
        .unwrap_or(link)
        .trim_end_matches('/');
    path.rsplit('/').next()?.parse().ok()
}

/// Extracts the lowercase host of a URL string
pub fn extract_domain(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()?
        .host_str()
        .map(|host| host.to_lowercase())
}

/// Checks if a domain matches a pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain.
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => candidate == base || candidate.ends_with(&format!(".{}", base)),
        None => candidate == pattern,
    }
}

/// True when the link's host matches any of the given domain patterns
pub fn domain_allowed(link: &str, patterns: &[&str]) -> bool {
    match extract_domain(link) {
        Some(domain) => patterns
            .iter()
            .any(|pattern| matches_wildcard(pattern, &domain)),
        None => false,
    }
}
