//! Springer orchestrators against pre-loaded pages and an in-memory catalog

use crate::support::{article_links, publication, test_config, RecordingCatalog, SPRINGER};
use catalog_crawler::browser::StaticPage;
use catalog_crawler::crawler::TaskContext;
use catalog_crawler::model::{ArticleRef, IssueCursor, RecentPublication, Volume};
use catalog_crawler::Task;

const JOURNAL: &str = "https://link.springer.com/journal/10207";

fn browse_url(page: usize) -> String {
    format!(
        "{}/journals/browse-subject?subject=COMPUTER_SCIENCE&sortBy=&page={}",
        SPRINGER, page
    )
}

fn card(title: &str, href: &str) -> String {
    format!(
        r#"<li class="app-card-open"><h3 class="app-card-open__heading"><a href="{}">{}</a></h3></li>"#,
        href, title
    )
}

fn issue_page(articles: &[&str]) -> String {
    let cards: String = articles
        .iter()
        .map(|id| {
            format!(
                r#"<li class="app-card-open"><div class="app-card-open__meta"><span class="c-meta__type">Research-Article</span></div>
                   <h3 class="app-card-open__heading"><a href="/article/10.1007/{}">{}</a></h3></li>"#,
                id, id
            )
        })
        .collect();
    format!(r#"<ol class="u-list-reset">{}</ol>"#, cards)
}

fn article_url(id: &str) -> String {
    format!("{}/article/10.1007/{}", SPRINGER, id)
}

fn article_page(title: &str) -> String {
    format!(r#"<h1 class="c-article-title">{}</h1>"#, title)
}

const VOLUMES: &str = r#"
    <ul data-test="volumes-and-issues">
      <li><h2><span>Volume 23</span> <time>2024</time></h2><ul>
        <li class="c-list-group__item"><a>Issue 1</a> <time>February 2024</time></li>
        <li class="c-list-group__item"><a>Issue 2</a> <time>April 2024</time></li>
        <li class="c-list-group__item"><a>Issue 3</a> <time>June 2024</time></li>
      </ul></li>
      <li><h2><span>Volume 22</span> <time>2023</time></h2><ul>
        <li class="c-list-group__item"><a>Issue 1</a> <time>February 2023</time></li>
      </ul></li>
    </ul>"#;

#[tokio::test]
async fn test_journals_list_walks_every_page() {
    let page = StaticPage::new()
        .with_document(
            browse_url(1),
            format!(
                r#"<span data-test="results-data-total">1-20 of 25</span><ul>{}{}</ul>"#,
                card("IJIS", "/journal/10207"),
                card("Elsewhere", "https://www.example.org/journal")
            ),
        )
        .with_document(browse_url(2), format!("<ul>{}</ul>", card("JIS", "https://jis.springeropen.com/")));
    let catalog = RecordingCatalog::default();
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::SpringerJournalsList.run(&ctx).await.unwrap();

    let titles: Vec<_> = catalog
        .stored_publications()
        .into_iter()
        .map(|publication| publication.title)
        .collect();
    assert_eq!(titles, vec!["IJIS", "JIS"]);
}

#[tokio::test]
async fn test_publications_volumes_issues_in_batches() {
    let mut page = StaticPage::new();
    let mut publications = Vec::new();
    for id in 1..=3 {
        let link = format!("{}/journal/{}", SPRINGER, id);
        page = page
            .with_document(
                link.clone(),
                r#"<div class="c-list-description__item" data-test="springer-print-issn"><dd class="c-list-description__details">1615-5262</dd></div>"#,
            )
            .with_document(format!("{}/volumes-and-issues", link), VOLUMES);
        publications.push(publication(id, &link, None, None));
    }
    publications.push(publication(9, "https://jis.springeropen.com/", None, None));

    let catalog = RecordingCatalog {
        publications,
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::SpringerPublicationsVolumesIssues.run(&ctx).await.unwrap();

    let batches = catalog.update_batches();
    let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 1]);

    let update = &batches[0][0];
    assert_eq!(update.issn.as_deref(), Some("1615-5262"));
    assert_eq!(update.year_published, Some(2023));
    let numbers: Vec<_> = update
        .volumes
        .as_ref()
        .unwrap()
        .iter()
        .map(|v| v.number.as_str())
        .collect();
    assert_eq!(numbers, vec!["22", "23"]);

    assert!(!page.visits().iter().any(|url| url.contains("springeropen")));
}

#[tokio::test]
async fn test_update_skips_known_articles() {
    let page = StaticPage::new()
        .with_document(browse_url(1), "<ul></ul>")
        .with_document(format!("{}/volumes-and-issues", JOURNAL), VOLUMES)
        .with_document(format!("{}/volumes-and-issues/23-2", JOURNAL), issue_page(&["s1", "s2"]))
        .with_document(format!("{}/volumes-and-issues/23-3", JOURNAL), issue_page(&["s3"]))
        .with_document(article_url("s2"), article_page("Second"))
        .with_document(article_url("s3"), article_page("Third"));

    let catalog = RecordingCatalog {
        recent: vec![RecentPublication {
            publication: publication(11, JOURNAL, Some("1615-5262"), Some(2002)),
            recent_volume: Some(Volume::new("23", Some(2024))),
            recent_issue: Some(IssueCursor {
                name: "2".to_string(),
                month_published: "4".to_string(),
                articles: vec![ArticleRef { link: article_url("s1") }],
            }),
            recent_article: Some(article_url("s1")),
        }],
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::SpringerUpdate.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    let volumes = updates[0].volumes.as_ref().unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].number, "23");

    let issues: Vec<_> = volumes[0].issues.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(issues, vec!["2", "3"]);
    let months: Vec<_> = volumes[0].issues.iter().map(|i| i.month_published.as_str()).collect();
    assert_eq!(months, vec!["4", "6"]);
    assert_eq!(article_links(&volumes[0].issues[0].articles), vec![article_url("s2")]);
    assert_eq!(article_links(&volumes[0].issues[1].articles), vec![article_url("s3")]);

    assert!(!page.visits().contains(&article_url("s1")));
}
