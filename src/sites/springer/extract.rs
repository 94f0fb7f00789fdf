//! Springer Link page parsers

use crate::crawler::{Outcome, SkipReason};
use crate::model::{sort_issues_by_month, Article, Author, Issue, Keyword, NewPublication, Publisher, Volume, JOURNAL};
use crate::sites::html::{cached_regex, first_link, first_text, select_all, text_of, Snapshot};
use crate::sites::{format_date, last_year, month_published, Site};
use regex::Regex;
use scraper::ElementRef;
use std::sync::OnceLock;
use url::Url;

const PUBLISHER: &str = "Springer Nature";

/// Journals per page of the subject browser
const PAGE_SIZE: usize = 20;

const ARTICLE_TYPES: [&str; 3] = ["article", "research-article", "opinion paper"];

/// Number of result pages announced by "... of N" on the subject browser
pub fn parse_total_pages(snapshot: &Snapshot) -> usize {
    static TOTAL: OnceLock<Option<Regex>> = OnceLock::new();
    let document = snapshot.document();

    let total = cached_regex(&TOTAL, r"of\s+([\d,]+)").and_then(|total| {
        let text = first_text(document.root_element(), r#"span[data-test="results-data-total"]"#)?;
        let count = total.captures(&text)?[1].replace(',', "").parse::<usize>().ok();
        count
    });
    total.map_or(1, |total| total.div_ceil(PAGE_SIZE).max(1))
}

/// Journal cards of one subject-browser page
pub fn parse_publications(snapshot: &Snapshot) -> Vec<NewPublication> {
    let document = snapshot.document();

    select_all(document.root_element(), ".app-card-open")
        .into_iter()
        .filter_map(|card| {
            Some(NewPublication {
                title: first_text(card, ".app-card-open__heading")?,
                link: first_link(card, ".app-card-open__heading a", &snapshot.url)?,
                description: first_text(card, ".app-card-open__description p"),
                publishers: vec![Publisher::new(PUBLISHER, Site::Springer.as_str())],
                kind: JOURNAL.to_string(),
                issn: None,
                year_published: None,
            })
        })
        .collect()
}

/// Print ISSN from a journal's about box
pub fn parse_issn(snapshot: &Snapshot) -> Option<String> {
    let document = snapshot.document();
    let issn = first_text(
        document.root_element(),
        r#".c-list-description__item[data-test="springer-print-issn"] dd.c-list-description__details"#,
    );
    issn
}

/// Year of the oldest listed volume, the last entry of the volume list
pub fn parse_year_published(snapshot: &Snapshot) -> Option<i32> {
    let document = snapshot.document();
    let year = first_text(document.root_element(), r#"[data-test="volumes-and-issues"] li:last-child h2 time"#)
        .and_then(|text| last_year(&text));
    year
}

/// Volumes and issues of a journal's volumes-and-issues page
///
/// Volumes lacking a number, a year or any issue are dropped. Issues are
/// sorted by month.
pub fn parse_volumes(snapshot: &Snapshot) -> Vec<Volume> {
    let document = snapshot.document();

    select_all(document.root_element(), r#"[data-test="volumes-and-issues"] li"#)
        .into_iter()
        .filter_map(|entry| {
            let number = first_text(entry, "h2 span:first-child")?
                .replace("Volume ", "")
                .trim()
                .to_string();
            let year_published = first_text(entry, "h2 time").and_then(|text| last_year(&text))?;

            let mut issues: Vec<Issue> = select_all(entry, ".c-list-group__item")
                .into_iter()
                .filter_map(parse_issue)
                .collect();
            sort_issues_by_month(&mut issues);

            let mut volume = Volume::new(number, Some(year_published));
            volume.issues = issues;
            (!volume.number.is_empty() && !volume.issues.is_empty()).then_some(volume)
        })
        .collect()
}

fn parse_issue(item: ElementRef<'_>) -> Option<Issue> {
    let label = first_text(item, "a")?;
    let name = label.replace("Issue ", "");
    let name = name.split_whitespace().next()?.to_string();
    let month = first_text(item, "time")
        .map(|date| month_published(&date))
        .unwrap_or_default();

    Some(Issue::new(name, month))
}

/// Links of the research articles listed on an issue page
pub fn parse_article_urls(snapshot: &Snapshot) -> Vec<String> {
    let document = snapshot.document();

    select_all(document.root_element(), ".u-list-reset .app-card-open")
        .into_iter()
        .filter(|card| {
            first_text(*card, ".app-card-open__meta .c-meta__type")
                .map(|kind| kind.to_lowercase())
                .map_or(false, |kind| ARTICLE_TYPES.contains(&kind.as_str()))
        })
        .filter_map(|card| first_link(card, ".app-card-open__heading a", &snapshot.url))
        .collect()
}

/// The article on a Springer article page
///
/// Author profiles point at the site search for the author's name, under
/// `base`.
pub fn parse_article(snapshot: &Snapshot, url: &str, base: &str) -> Outcome<Article> {
    let document = snapshot.document();
    let root = document.root_element();

    let Some(title) = first_text(root, ".c-article-title") else {
        return Outcome::Skip(SkipReason::MissingField("title"));
    };

    let university = first_text(root, ".c-article-author-affiliation__address");
    let authors = select_all(root, ".c-article-author-list__item")
        .into_iter()
        .filter_map(|author| {
            let name = first_text(author, r#"a[data-test="author-name"]"#)?;
            Some(Author {
                profile_link: author_search_link(base, &name),
                orcid_link: first_link(author, ".js-orcid", &snapshot.url),
                university: university.clone(),
                name,
            })
        })
        .collect();

    let keywords = select_all(root, ".c-article-subject-list__subject a")
        .into_iter()
        .filter_map(|keyword| {
            let name = text_of(keyword).to_lowercase();
            (!name.is_empty()).then(|| Keyword::new(name))
        })
        .collect();

    Outcome::Success(Article {
        title,
        description: first_text(root, ".c-article-section__content p"),
        published_date: first_text(root, ".c-article-identifiers__item time").and_then(|date| format_date(&date)),
        link: url.to_string(),
        doi: first_text(
            root,
            "li.c-bibliographic-information__list-item--full-width .c-bibliographic-information__value",
        ),
        pdf_link: first_link(root, ".c-pdf-container a", &snapshot.url),
        authors,
        keywords,
    })
}

/// `{base}/search?dc.creator=<name>`
fn author_search_link(base: &str, name: &str) -> Option<String> {
    let mut link = Url::parse(base).ok()?.join("search").ok()?;
    link.query_pairs_mut().append_pair("dc.creator", name);
    Some(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(url: &str, html: &str) -> Snapshot {
        Snapshot::new(html, Url::parse(url).unwrap())
    }

    #[test]
    fn test_total_pages() {
        let page = snapshot(
            "https://link.springer.com/journals/browse-subject?page=1",
            r#"<span data-test="results-data-total">Showing 1-20 of 1,045 results</span>"#,
        );
        assert_eq!(parse_total_pages(&page), 53);

        let bare = snapshot("https://link.springer.com/journals/browse-subject?page=1", "<p></p>");
        assert_eq!(parse_total_pages(&bare), 1);
    }

    #[test]
    fn test_parse_publications() {
        let page = snapshot(
            "https://link.springer.com/journals/browse-subject?page=1",
            r#"
            <ul>
              <li class="app-card-open">
                <h3 class="app-card-open__heading"><a href="/journal/10207">International Journal of Information Security</a></h3>
                <div class="app-card-open__description"><p>Security research.</p></div>
              </li>
              <li class="app-card-open">
                <h3 class="app-card-open__heading"><a href="https://jis.springeropen.com/">Journal of Internet Services</a></h3>
              </li>
            </ul>"#,
        );

        let publications = parse_publications(&page);
        assert_eq!(publications.len(), 2);
        assert_eq!(publications[0].link, "https://link.springer.com/journal/10207");
        assert_eq!(publications[0].description.as_deref(), Some("Security research."));
        assert_eq!(publications[0].publishers, vec![Publisher::new("Springer Nature", "springer")]);
        assert_eq!(publications[1].link, "https://jis.springeropen.com/");
    }

    #[test]
    fn test_parse_issn() {
        let page = snapshot(
            "https://link.springer.com/journal/10207",
            r#"<dl><div class="c-list-description__item" data-test="springer-print-issn"><dt>Print ISSN</dt><dd class="c-list-description__details">1615-5262</dd></div></dl>"#,
        );
        assert_eq!(parse_issn(&page).as_deref(), Some("1615-5262"));
    }

    const VOLUMES: &str = r#"
        <ul data-test="volumes-and-issues">
          <li>
            <h2><span>Volume 23</span> <time>January - December 2024</time></h2>
            <ul>
              <li class="c-list-group__item"><a>Issue 2</a> <time>April 2024</time></li>
              <li class="c-list-group__item"><a>Issue 10</a> <time>December 2024</time></li>
              <li class="c-list-group__item"><a>Issue 1</a> <time>February 2024</time></li>
            </ul>
          </li>
          <li>
            <h2><span>Volume 22</span> <time>2023</time></h2>
            <ul><li class="c-list-group__item"><a>Issue 3-4 Special Issue</a> <time>August 2023</time></li></ul>
          </li>
          <li>
            <h2><span>Volume 21</span> <time>2022</time></h2>
            <ul></ul>
          </li>
          <li>
            <h2><span>Volume 1</span> <time>2001</time></h2>
            <ul><li class="c-list-group__item"><a>Issue 1</a> <time>October 2001</time></li></ul>
          </li>
        </ul>"#;

    #[test]
    fn test_parse_volumes() {
        let page = snapshot("https://link.springer.com/journal/10207/volumes-and-issues", VOLUMES);
        let volumes = parse_volumes(&page);

        let numbers: Vec<_> = volumes.iter().map(|v| v.number.as_str()).collect();
        assert_eq!(numbers, vec!["23", "22", "1"]);

        let names: Vec<_> = volumes[0].issues.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "10"]);
        assert_eq!(volumes[0].issues[0].month_published, "2");
        assert_eq!(volumes[0].year_published, Some(2024));

        assert_eq!(volumes[1].issues, vec![Issue::new("3-4", "8")]);
    }

    #[test]
    fn test_issues_follow_publication_month() {
        let page = snapshot(
            "https://link.springer.com/journal/10207/volumes-and-issues",
            r#"
            <ul data-test="volumes-and-issues">
              <li>
                <h2><span>Volume 24</span> <time>2024 - 2025</time></h2>
                <ul>
                  <li class="c-list-group__item"><a>Issue 1</a> <time>December 2024</time></li>
                  <li class="c-list-group__item"><a>Issue 2-3</a> <time>January 2025</time></li>
                </ul>
              </li>
            </ul>"#,
        );

        let volumes = parse_volumes(&page);
        assert_eq!(volumes[0].issues, vec![Issue::new("2-3", "1"), Issue::new("1", "12")]);
    }

    #[test]
    fn test_year_published_from_last_volume() {
        let page = snapshot("https://link.springer.com/journal/10207/volumes-and-issues", VOLUMES);
        assert_eq!(parse_year_published(&page), Some(2001));
    }

    #[test]
    fn test_article_urls_filter_types() {
        let page = snapshot(
            "https://link.springer.com/journal/10207/volumes-and-issues/23-1",
            r#"
            <ol class="u-list-reset">
              <li class="app-card-open">
                <div class="app-card-open__meta"><span class="c-meta__type">Research Article</span></div>
                <h3 class="app-card-open__heading"><a href="/article/10.1007/s1">One</a></h3>
              </li>
              <li class="app-card-open">
                <div class="app-card-open__meta"><span class="c-meta__type">Research-Article</span></div>
                <h3 class="app-card-open__heading"><a href="/article/10.1007/s2">Two</a></h3>
              </li>
              <li class="app-card-open">
                <div class="app-card-open__meta"><span class="c-meta__type">Opinion Paper</span></div>
                <h3 class="app-card-open__heading"><a href="/article/10.1007/s3">Three</a></h3>
              </li>
              <li class="app-card-open">
                <div class="app-card-open__meta"><span class="c-meta__type">Editorial</span></div>
                <h3 class="app-card-open__heading"><a href="/article/10.1007/s4">Four</a></h3>
              </li>
            </ol>"#,
        );

        assert_eq!(
            parse_article_urls(&page),
            vec![
                "https://link.springer.com/article/10.1007/s2".to_string(),
                "https://link.springer.com/article/10.1007/s3".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_article() {
        let page = snapshot(
            "https://link.springer.com/article/10.1007/s2",
            r#"
            <h1 class="c-article-title">Secure Channels</h1>
            <ul class="c-article-identifiers"><li class="c-article-identifiers__item">Published: <time datetime="2024-02-14">14 February 2024</time></li></ul>
            <div class="c-article-section__content"><p>We secure channels.</p></div>
            <ul class="c-article-author-list">
              <li class="c-article-author-list__item"><a data-test="author-name">Alice Smith</a><a class="js-orcid" href="https://orcid.org/0000-0003">ORCID</a></li>
              <li class="c-article-author-list__item"><a data-test="author-name">Bob Jones</a></li>
            </ul>
            <p class="c-article-author-affiliation__address">ETH Zurich</p>
            <ul><li class="c-bibliographic-information__list-item--full-width"><span class="c-bibliographic-information__value">https://doi.org/10.1007/s2</span></li></ul>
            <div class="c-pdf-container"><a href="/content/pdf/10.1007/s2.pdf">Download PDF</a></div>
            <ul><li class="c-article-subject-list__subject"><a>Cryptography</a></li></ul>"#,
        );

        let article = parse_article(&page, "https://link.springer.com/article/10.1007/s2", "https://link.springer.com")
            .success()
            .unwrap();
        assert_eq!(article.title, "Secure Channels");
        assert_eq!(article.published_date.as_deref(), Some("14-02-2024"));
        assert_eq!(article.doi.as_deref(), Some("https://doi.org/10.1007/s2"));
        assert_eq!(
            article.pdf_link.as_deref(),
            Some("https://link.springer.com/content/pdf/10.1007/s2.pdf")
        );
        assert_eq!(article.keywords, vec![Keyword::new("cryptography")]);

        assert_eq!(article.authors.len(), 2);
        assert_eq!(article.authors[0].orcid_link.as_deref(), Some("https://orcid.org/0000-0003"));
        assert_eq!(
            article.authors[1].profile_link.as_deref(),
            Some("https://link.springer.com/search?dc.creator=Bob+Jones")
        );
        assert!(article
            .authors
            .iter()
            .all(|author| author.university.as_deref() == Some("ETH Zurich")));
    }

    #[test]
    fn test_article_without_title_is_skipped() {
        let page = snapshot("https://link.springer.com/article/x", "<p></p>");
        assert!(matches!(
            parse_article(&page, "https://link.springer.com/article/x", "https://link.springer.com"),
            Outcome::Skip(SkipReason::MissingField("title"))
        ));
    }
}
