//! ACM Digital Library page parsers
//!
//! Pure functions over a page snapshot, so they can be tested against
//! fixture HTML.

use crate::crawler::{Outcome, SkipReason};
use crate::model::{Article, Author, Issue, Keyword, NewPublication, Volume, JOURNAL};
use crate::sites::html::{
    cached_regex, first_attr, first_link, first_text, select_all, select_first, text_of, Snapshot,
};
use crate::sites::{derive_publishers, format_date, month_published, Site};
use regex::Regex;
use scraper::ElementRef;
use std::sync::OnceLock;

/// Citation headings that denote research content
const ARTICLE_TYPES: [&str; 3] = ["article", "research-article", "survey"];

/// Journals on the `/journals` index
pub fn parse_publications(snapshot: &Snapshot) -> Vec<NewPublication> {
    let document = snapshot.document();

    select_all(document.root_element(), ".search__item")
        .into_iter()
        .filter_map(|item| {
            let title = first_text(item, ".search__item-title .browse-title")?;
            let link = first_link(item, ".search__item-title a", &snapshot.url)?;

            Some(NewPublication {
                publishers: derive_publishers(&title, Site::Acm, None, "ACM"),
                description: first_text(item, ".meta__abstract"),
                title,
                link,
                kind: JOURNAL.to_string(),
                issn: None,
                year_published: None,
            })
        })
        .collect()
}

/// First "Publication Years" value and the ISSN badge of a journal page
pub fn parse_publication_meta(snapshot: &Snapshot) -> (Option<i32>, Option<String>) {
    let document = snapshot.document();
    let root = document.root_element();

    let year_published = select_all(root, ".bibliometrics__block")
        .into_iter()
        .find(|block| {
            first_text(*block, ".bibliometrics__title")
                .map_or(false, |title| title.contains("Publication Years"))
        })
        .and_then(|block| first_text(block, ".bibliometrics__count span"))
        .and_then(|years| years.split(" - ").next().and_then(|first| first.trim().parse().ok()));

    let issn = select_all(root, ".toc-badge__row")
        .into_iter()
        .find(|row| text_of(*row).contains("ISSN"))
        .and_then(|row| first_text(row, ".toc-badge__value"));

    (year_published, issn)
}

/// Earliest selectable year at or after `min_year` on a list-of-issues page
pub fn parse_start_year(snapshot: &Snapshot, min_year: i32) -> Option<i32> {
    static YEAR: OnceLock<Option<Regex>> = OnceLock::new();
    let year = cached_regex(&YEAR, r"\d{4}")?;
    let document = snapshot.document();

    select_all(document.root_element(), ".loi__list.tab__nav.swipe__list > li > a")
        .into_iter()
        .filter_map(|link| link.value().attr("aria-label"))
        .filter(|label| label.starts_with("select year"))
        .filter_map(|label| year.find(label)?.as_str().parse::<i32>().ok())
        .filter(|year| *year >= min_year)
        .min()
}

/// Volumes (with their issues) of one list-of-issues year page
///
/// Volume headings read "YYYY, Volume N". Issues live in the element right
/// after the heading; a volume without issue labels counts as a single
/// issue "1" published in January.
pub fn parse_volumes(snapshot: &Snapshot) -> Vec<Volume> {
    static HEADING: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(heading) = cached_regex(&HEADING, r"(\d{4}),\s*Volume\s*(\d+)") else {
        return Vec::new();
    };
    let document = snapshot.document();

    select_all(document.root_element(), ".loi__vol-title.left-bordered-title")
        .into_iter()
        .filter_map(|title| {
            let text = text_of(title);
            let captures = heading.captures(&text)?;
            let year_published = captures[1].parse().ok();

            let mut volume = Volume::new(&captures[2], year_published);
            if let Some(list) = title.next_siblings().find_map(ElementRef::wrap) {
                volume.issues = select_all(list, ".loi__issue")
                    .into_iter()
                    .filter_map(parse_issue)
                    .collect();
            }
            Some(volume)
        })
        .collect()
}

fn parse_issue(issue: ElementRef<'_>) -> Option<Issue> {
    let Some(label) = first_text(issue, ".issue") else {
        return Some(Issue::new("1", "1"));
    };
    let date = first_text(issue, ".coverDate")?;
    let name = label.replace("Issue ", "").trim().to_string();

    Some(Issue::new(name, month_published(&date)))
}

/// Number of entries hidden behind the "show all" button, from its "(+N)"
pub fn parse_hidden_count(snapshot: &Snapshot) -> Option<usize> {
    static COUNT: OnceLock<Option<Regex>> = OnceLock::new();
    let count = cached_regex(&COUNT, r"\(\+(\d+)\)")?;
    let document = snapshot.document();

    let text = first_text(document.root_element(), ".showAllProceedings")?;
    let hidden = count.captures(&text)?[1].parse().ok();
    hidden
}

/// Issue-level keywords, lowercased
pub fn parse_keywords(snapshot: &Snapshot) -> Vec<Keyword> {
    let document = snapshot.document();

    select_all(document.root_element(), ".tags-widget__content ul li a")
        .into_iter()
        .map(|keyword| text_of(keyword).to_lowercase())
        .filter(|name| !name.is_empty())
        .map(Keyword::new)
        .collect()
}

/// Links of the research articles in a table of contents
///
/// Entries without a citation heading are skipped.
pub fn parse_article_urls(snapshot: &Snapshot) -> Vec<String> {
    let document = snapshot.document();

    select_all(document.root_element(), ".issue-item-container")
        .into_iter()
        .filter(|item| {
            first_text(*item, ".issue-item__citation .issue-heading")
                .map(|citation| citation.to_lowercase())
                .map_or(false, |citation| {
                    ARTICLE_TYPES.iter().any(|kind| citation.contains(kind))
                })
        })
        .filter_map(|item| first_link(item, ".issue-item__title a", &snapshot.url))
        .collect()
}

/// The article on an ACM article page; keywords come from the issue page
pub fn parse_article(snapshot: &Snapshot, url: &str) -> Outcome<Article> {
    let document = snapshot.document();
    let root = document.root_element();

    let Some(title) = first_text(root, r#"h1[property="name"]"#) else {
        return Outcome::Skip(SkipReason::MissingField("title"));
    };

    let authors = select_all(root, r#"[property="author"] .dropBlock__body"#)
        .into_iter()
        .filter_map(|author| {
            Some(Author {
                name: first_text(author, r#"[property="name"]"#)?,
                university: first_text(author, r#".affiliations [property="name"]"#),
                profile_link: first_link(author, ".core-author-link a", &snapshot.url),
                orcid_link: first_link(author, ".core-orcid-link a", &snapshot.url),
            })
        })
        .collect();

    Outcome::Success(Article {
        title,
        description: first_text(root, r#"[property="abstract"] div[role="paragraph"]"#),
        published_date: first_text(root, ".core-published .core-date-published")
            .and_then(|date| format_date(&date)),
        link: url.to_string(),
        doi: first_attr(root, ".doi a", "href"),
        pdf_link: first_link(root, r#".btn.btn--pdf.red[title="View PDF"]"#, &snapshot.url),
        authors,
        keywords: Vec::new(),
    })
}

/// Whether the page carries the list-of-issues year selector
pub fn has_year_selector(snapshot: &Snapshot) -> bool {
    let document = snapshot.document();
    let found = select_first(document.root_element(), ".loi__list.tab__nav.swipe__list").is_some();
    found
}
