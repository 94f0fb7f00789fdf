//! MDPI page parsers

use crate::crawler::{Outcome, SkipReason};
use crate::model::{Article, Author, Issue, Keyword, NewPublication, Volume, JOURNAL};
use crate::sites::html::{
    cached_regex, collapse_whitespace, first_attr, first_link, first_text, select_all, select_first, text_of,
    Snapshot,
};
use crate::sites::{derive_publishers, format_date, month_published, Site};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

const NOT_FOUND_HEADING: &str = "Error 404 - File not found";
const EDITORIAL: &str = "Editorial";

/// Journals of a subject table, with ISSN and start year from their columns
pub fn parse_publications(snapshot: &Snapshot) -> Vec<NewPublication> {
    let document = snapshot.document();

    select_all(document.root_element(), ".journaltable tbody tr")
        .into_iter()
        .filter_map(|row| {
            let title = first_text(row, ".journal-name-cell")?;
            let link = first_link(row, ".journal-name-cell a", &snapshot.url)?;
            let cells = select_all(row, "td");
            let cell = |index: usize| cells.get(index).map(|cell| text_of(*cell)).filter(|text| !text.is_empty());

            Some(NewPublication {
                publishers: derive_publishers(&title, Site::Mdpi, Some("MDPI"), "MDPI"),
                issn: cell(2),
                year_published: cell(3).and_then(|year| year.parse().ok()),
                title,
                link,
                description: None,
                kind: JOURNAL.to_string(),
            })
        })
        .collect()
}

/// Journal description: the introduction text before the first list
pub fn parse_description(snapshot: &Snapshot) -> Option<String> {
    let document = snapshot.document();
    let content = select_first(document.root_element(), ".journal__description__content")?;

    let inner = content.inner_html();
    let intro = inner.split("<ul").next().unwrap_or_default();
    let fragment = Html::parse_fragment(intro);
    let text = collapse_whitespace(&fragment.root_element().text().collect::<String>());

    (!text.is_empty()).then_some(text)
}

/// Volumes from the side menu, entries read "Vol. N (YYYY)"
pub fn parse_volumes(snapshot: &Snapshot) -> Vec<Volume> {
    static VOLUME: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(pattern) = cached_regex(&VOLUME, r"Vol\.\s*(\d+)\s*\((\d{4})\)") else {
        return Vec::new();
    };
    let document = snapshot.document();

    select_all(document.root_element(), ".journal-browser-volumes .side-menu-li a")
        .into_iter()
        .filter_map(|entry| {
            let text = text_of(entry);
            let captures = pattern.captures(&text)?;
            Some(Volume::new(&captures[1], captures[2].parse().ok()))
        })
        .collect()
}

/// Issues of a volume page
///
/// Volumes are rendered either as a plain list ("Issue 3 (March 2023)") or
/// as a grid of covers with the number and month in separate headings.
pub fn parse_issues(snapshot: &Snapshot) -> Vec<Issue> {
    static LISTED: OnceLock<Option<Regex>> = OnceLock::new();
    static COVER: OnceLock<Option<Regex>> = OnceLock::new();
    let document = snapshot.document();
    let root = document.root_element();

    let mut issues = Vec::new();
    if let Some(listed) = cached_regex(&LISTED, r"Issue (\d+)\s\((\w+)\s\d{4}\)") {
        for entry in select_all(root, ".content__container .ul-spaced ul li a") {
            if let Some(captures) = listed.captures(&text_of(entry)) {
                issues.push(Issue::new(&captures[1], month_published(&captures[2])));
            }
        }
    }
    if let Some(cover) = cached_regex(&COVER, r"Iss\.\s(\d+)") {
        for entry in select_all(root, ".content__container .issue-cover") {
            let name = first_text(entry, "h4")
                .and_then(|heading| cover.captures(&heading).map(|captures| captures[1].to_string()));
            let month = first_text(entry, "h5").map(|heading| month_published(&heading));
            if let (Some(name), Some(month)) = (name, month) {
                issues.push(Issue::new(name, month));
            }
        }
    }
    issues
}

pub fn is_not_found(snapshot: &Snapshot) -> bool {
    let document = snapshot.document();
    let heading = first_text(document.root_element(), ".content__container h1");
    heading.as_deref() == Some(NOT_FOUND_HEADING)
}

/// Article links of an issue page, editorials excluded
pub fn parse_article_urls(snapshot: &Snapshot) -> Vec<String> {
    let document = snapshot.document();

    select_all(document.root_element(), ".article-item .article-content")
        .into_iter()
        .filter(|item| first_text(*item, ".article-icons .label.articletype").as_deref() != Some(EDITORIAL))
        .filter_map(|item| first_link(item, ".title-link", &snapshot.url))
        .collect()
}

pub fn parse_article(snapshot: &Snapshot, url: &str) -> Outcome<Article> {
    if is_not_found(snapshot) {
        return Outcome::NotFound;
    }

    let document = snapshot.document();
    let root = document.root_element();

    if let Some(kind) = first_text(root, ".article-icons .label.articletype") {
        if kind == EDITORIAL {
            return Outcome::Skip(SkipReason::FilteredType(kind));
        }
    }
    let Some(title) = first_text(root, r#"h1.title.hypothesis_container[itemprop="name"]"#) else {
        return Outcome::Skip(SkipReason::MissingField("title"));
    };

    let description = first_text(root, ".html-abstract .html-p")
        .or_else(|| first_text(root, "div.html-body > div.html-p:first-of-type"));

    Outcome::Success(Article {
        title,
        description,
        published_date: first_text(root, ".pubhistory span:last-of-type").and_then(|date| format_date(&date)),
        link: url.to_string(),
        doi: parse_doi(root),
        pdf_link: first_link(root, ".UD_ArticlePDF", &snapshot.url),
        authors: parse_authors(root, snapshot),
        keywords: parse_keywords(root),
    })
}

fn parse_doi(root: ElementRef<'_>) -> Option<String> {
    static DOI: OnceLock<Option<Regex>> = OnceLock::new();
    let doi = cached_regex(&DOI, r"https://doi\.org/\S+")?;
    let identity = first_text(root, ".bib-identity")?;
    let found = doi.find(&identity).map(|m| m.as_str().to_string());
    found
}

fn parse_keywords(root: ElementRef<'_>) -> Vec<Keyword> {
    let Some(group) = select_first(root, ".html-gwd-group") else {
        return Vec::new();
    };
    select_all(group, "a")
        .into_iter()
        .map(text_of)
        .filter(|name| !name.is_empty())
        .map(Keyword::new)
        .collect()
}

/// Authors matched to their affiliation by superscript number
///
/// An author without a matching superscript gets the first affiliation.
fn parse_authors(root: ElementRef<'_>, snapshot: &Snapshot) -> Vec<Author> {
    let affiliations: Vec<(String, Option<String>)> = select_all(root, ".art-affiliations .affiliation")
        .into_iter()
        .filter_map(|affiliation| {
            let name = first_text(affiliation, ".affiliation-name")?;
            Some((first_text(affiliation, ".affiliation-item").unwrap_or_default(), Some(name)))
        })
        .collect();
    let fallback = affiliations.first().and_then(|(_, name)| name.clone());

    select_all(root, ".art-authors .inlineblock")
        .into_iter()
        .filter_map(|author| {
            let name = first_text(author, "div.profile-card-drop")?;
            let marker = first_text(author, "sup")
                .and_then(|sup| sup.split(',').next().map(|first| first.trim().to_string()));

            let university = marker
                .and_then(|marker| {
                    affiliations
                        .iter()
                        .find(|(item, _)| *item == marker)
                        .and_then(|(_, name)| name.clone())
                })
                .or_else(|| fallback.clone());

            let profile_link = first_link(author, r#"a[href*="sciprofiles.com"]"#, &snapshot.url)
                .or_else(|| first_link(author, "a", &snapshot.url));

            Some(Author {
                name,
                university,
                profile_link,
                orcid_link: first_attr(author, r#"a[href*="orcid.org"]"#, "href"),
            })
        })
        .collect()
}
