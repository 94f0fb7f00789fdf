//! MDPI orchestrators against pre-loaded pages and an in-memory catalog

use crate::support::{article_links, publication, test_config, RecordingCatalog, MDPI};
use catalog_crawler::browser::StaticPage;
use catalog_crawler::crawler::TaskContext;
use catalog_crawler::model::{IssueCursor, RecentPublication, Volume};
use catalog_crawler::Task;

const JOURNAL: &str = "https://www.mdpi.com/journal/algorithms";

fn subject_page(rows: &str) -> String {
    format!(r#"<table class="journaltable"><tbody>{}</tbody></table>"#, rows)
}

fn article_page(title: &str) -> String {
    format!(
        r#"<h1 class="title hypothesis_container" itemprop="name">{}</h1>
           <div class="bib-identity">https://doi.org/10.3390/{}</div>"#,
        title,
        title.to_lowercase()
    )
}

fn issue_page(ids: &[(&str, u32)]) -> String {
    ids.iter()
        .map(|(path, id)| {
            format!(
                r#"<div class="article-item"><div class="article-content"><a class="title-link" href="/1999-4893/{}/{}">x</a></div></div>"#,
                path, id
            )
        })
        .collect()
}

fn volume_page(issues: &[(&str, &str)]) -> String {
    let items: String = issues
        .iter()
        .map(|(number, month)| format!("<li><a>Issue {} ({} 2023)</a></li>", number, month))
        .collect();
    format!(
        r#"<div class="middle-column__main"><div class="content__container"><div class="ul-spaced"><ul>{}</ul></div></div></div>"#,
        items
    )
}

#[tokio::test]
async fn test_journals_list_stores_subject_table() {
    let page = StaticPage::new().with_document(
        format!("{}/subject/computer-math", MDPI),
        subject_page(
            r#"<tr><td class="journal-name-cell"><a href="/journal/algorithms">Algorithms</a></td><td>a</td><td>1999-4893</td><td>2008</td></tr>"#,
        ),
    );
    let catalog = RecordingCatalog::default();
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiJournalsList.run(&ctx).await.unwrap();

    let stored = catalog.stored_publications();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].link, JOURNAL);
    assert_eq!(stored[0].issn.as_deref(), Some("1999-4893"));
    assert_eq!(stored[0].publishers[0].name, "MDPI");
}

#[tokio::test]
async fn test_navigation_failure_skips_publication() {
    let page = StaticPage::new()
        .with_failure("https://www.mdpi.com/journal/broken")
        .with_document(
            JOURNAL,
            r#"<div class="journal__description__content"><p>About algorithms.</p></div>
               <div class="journal-browser-volumes"><ul><li class="side-menu-li"><a>Vol. 16 (2023)</a></li></ul></div>"#,
        );
    let catalog = RecordingCatalog {
        publications: vec![
            publication(1, "https://www.mdpi.com/journal/broken", Some("0000-0000"), None),
            publication(2, JOURNAL, Some("1999-4893"), None),
        ],
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiPublicationsVolumes.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, 2);
    assert_eq!(updates[0].description.as_deref(), Some("About algorithms."));
    assert_eq!(updates[0].volumes, Some(vec![Volume::new("16", Some(2023))]));
}

#[tokio::test]
async fn test_issues_are_stored_per_volume() {
    let page = StaticPage::new().with_document(
        format!("{}/1999-4893/16", MDPI),
        volume_page(&[("3", "March"), ("1", "January"), ("2", "February")]),
    );
    let catalog = RecordingCatalog {
        publications: vec![
            publication(2, JOURNAL, Some("1999-4893"), None),
            publication(3, "https://www.mdpi.com/journal/no-issn", None, None),
        ],
        volumes: [(2, vec![Volume::new("16", Some(2023))])].into_iter().collect(),
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiIssues.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    let volumes = updates[0].volumes.as_ref().unwrap();
    let names: Vec<_> = volumes[0].issues.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_update_crawls_from_cursor() {
    let page = StaticPage::new()
        .with_document(format!("{}/subject/computer-math", MDPI), subject_page(""))
        .with_document(
            JOURNAL,
            r#"<div class="journal-browser-volumes"><ul>
                 <li class="side-menu-li"><a>Vol. 17 (2024)</a></li>
                 <li class="side-menu-li"><a>Vol. 16 (2023)</a></li>
                 <li class="side-menu-li"><a>Vol. 15 (2022)</a></li>
               </ul></div>"#,
        )
        .with_document(
            format!("{}/1999-4893/16", MDPI),
            volume_page(&[("1", "January"), ("2", "February"), ("3", "March")]),
        )
        .with_document(format!("{}/1999-4893/17", MDPI), volume_page(&[("1", "January")]))
        .with_document(
            format!("{}/1999-4893/16/2", MDPI),
            issue_page(&[("16/2", 119), ("16/2", 120), ("16/2", 121)]),
        )
        .with_document(format!("{}/1999-4893/16/3", MDPI), issue_page(&[("16/3", 130)]))
        .with_document(format!("{}/1999-4893/17/1", MDPI), issue_page(&[("17/1", 5)]))
        .with_document(format!("{}/1999-4893/16/2/121", MDPI), article_page("Late"))
        .with_document(format!("{}/1999-4893/16/3/130", MDPI), article_page("March"))
        .with_document(format!("{}/1999-4893/17/1/5", MDPI), article_page("Fresh"));

    let catalog = RecordingCatalog {
        recent: vec![RecentPublication {
            publication: publication(7, JOURNAL, Some("1999-4893"), Some(2008)),
            recent_volume: Some(Volume::new("16", Some(2023))),
            recent_issue: Some(IssueCursor {
                name: "2".to_string(),
                month_published: "2".to_string(),
                articles: Vec::new(),
            }),
            recent_article: Some(format!("{}/1999-4893/16/2/120", MDPI)),
        }],
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiUpdate.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, 7);

    let volumes = updates[0].volumes.as_ref().unwrap();
    let numbers: Vec<_> = volumes.iter().map(|v| v.number.as_str()).collect();
    assert_eq!(numbers, vec!["16", "17"]);

    let cursor_issues: Vec<_> = volumes[0].issues.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(cursor_issues, vec!["2", "3"]);
    assert_eq!(
        article_links(&volumes[0].issues[0].articles),
        vec!["https://www.mdpi.com/1999-4893/16/2/121"]
    );
    assert_eq!(
        article_links(&volumes[0].issues[1].articles),
        vec!["https://www.mdpi.com/1999-4893/16/3/130"]
    );
    assert_eq!(
        article_links(&volumes[1].issues[0].articles),
        vec!["https://www.mdpi.com/1999-4893/17/1/5"]
    );

    assert!(!page.visits().contains(&format!("{}/1999-4893/15", MDPI)));
    assert!(!page.visits().contains(&format!("{}/1999-4893/16/1", MDPI)));
}
