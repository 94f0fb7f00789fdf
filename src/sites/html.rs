//! HTML helpers shared by the site adapters
//!
//! Adapters read the serialized DOM of the loaded page and query it with CSS
//! selectors. Everything here is synchronous: `scraper::Html` must not be
//! held across an `.await`, so adapters take a `Snapshot` first and parse it
//! in plain functions.

use crate::browser::Page;
use crate::CrawlError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// The serialized DOM of the loaded page together with its URL
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub html: String,
    pub url: Url,
}

impl Snapshot {
    pub fn new(html: impl Into<String>, url: Url) -> Self {
        Self {
            html: html.into(),
            url,
        }
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Captures the current page
pub async fn snapshot(page: &dyn Page) -> crate::Result<Snapshot> {
    let html = page.content().await?;
    let current = page.current_url().await?.unwrap_or_default();
    let url = Url::parse(&current).map_err(|e| CrawlError::Extraction {
        url: current.clone(),
        message: format!("page has no usable URL: {}", e),
    })?;
    Ok(Snapshot { html, url })
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::error!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// All elements under `scope` matching `css`
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = selector(css) else {
        return Vec::new();
    };
    let found = scope.select(&selector).collect();
    found
}

/// First element under `scope` matching `css`
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    let found = scope.select(&selector).next();
    found
}

/// Text content with whitespace runs collapsed to single spaces
pub fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Non-empty text of the first match
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css)
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Attribute value of the first match
pub fn first_attr(scope: ElementRef<'_>, css: &str, name: &str) -> Option<String> {
    select_first(scope, css)?
        .value()
        .attr(name)
        .map(|value| value.trim().to_string())
}

/// Absolute `href` of the first match
pub fn first_link(scope: ElementRef<'_>, css: &str, base_url: &Url) -> Option<String> {
    let href = select_first(scope, css)?.value().attr("href")?;
    resolve_link(href, base_url)
}

/// Absolute `href` of the element itself
pub fn link_of(element: ElementRef<'_>, base_url: &Url) -> Option<String> {
    resolve_link(element.value().attr("href")?, base_url)
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

/// Collapses whitespace runs (including non-breaking spaces) and trims
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles a fixed pattern once
///
/// A pattern that fails to compile is logged once and treated as never
/// matching.
pub fn cached_regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!("Invalid pattern '{}': {}", pattern, e);
            None
        }
    })
    .as_ref()
}
