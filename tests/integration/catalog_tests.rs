//! Tasks wired to the HTTP catalog client, and configuration loading

use crate::support::{test_config, MDPI};
use catalog_crawler::browser::StaticPage;
use catalog_crawler::catalog::CatalogClient;
use catalog_crawler::config::load_config;
use catalog_crawler::crawler::TaskContext;
use catalog_crawler::Task;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_journals_list_posts_to_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scraper/publications"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!([{
            "publishers": [{"name": "MDPI", "scraper": "mdpi"}],
            "title": "Algorithms",
            "link": "https://www.mdpi.com/journal/algorithms",
            "type": "Journal",
            "issn": "1999-4893",
            "year_published": 2008
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"stored": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let page = StaticPage::new().with_document(
        format!("{}/subject/computer-math", MDPI),
        r#"<table class="journaltable"><tbody>
             <tr><td class="journal-name-cell"><a href="/journal/algorithms">Algorithms</a></td><td>ALG</td><td>1999-4893</td><td>2008</td></tr>
           </tbody></table>"#,
    );
    let config = test_config(&server.uri());
    let catalog = CatalogClient::new(&config.catalog).unwrap();
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiJournalsList.run(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_issues_round_trip_through_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/publications/mdpi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 2,
            "title": "Algorithms",
            "link": "https://www.mdpi.com/journal/algorithms",
            "issn": "1999-4893",
            "year_published": 2008
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/publications/2/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 16, "year_published": 2023}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/scraper/publications"))
        .and(body_json(json!([{
            "id": 2,
            "volumes": [{
                "number": "16",
                "year_published": 2023,
                "issues": [
                    {"name": "1", "month_published": "1"},
                    {"name": "2", "month_published": "2"}
                ]
            }]
        }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let page = StaticPage::new().with_document(
        format!("{}/1999-4893/16", MDPI),
        r#"<div class="middle-column__main"><div class="content__container"><div class="ul-spaced"><ul>
             <li><a>Issue 2 (February 2023)</a></li>
             <li><a>Issue 1 (January 2023)</a></li>
           </ul></div></div></div>"#,
    );
    let config = test_config(&server.uri());
    let catalog = CatalogClient::new(&config.catalog).unwrap();
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::MdpiIssues.run(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_catalog_ends_task_quietly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/recent/springer"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let page = StaticPage::new().with_document(
        "https://link.springer.com/journals/browse-subject?subject=COMPUTER_SCIENCE&sortBy=&page=1",
        "<ul></ul>",
    );
    let config = test_config(&server.uri());
    let catalog = CatalogClient::new(&config.catalog).unwrap();
    let ctx = TaskContext::new(&page, &catalog, &config);

    assert!(Task::SpringerUpdate.run(&ctx).await.is_ok());
}

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[catalog]
base-url = "https://catalog.example.org"
token = "file-token"

[sites]
acm = "https://dl.acm.org"
mdpi = "https://www.mdpi.com"
springer = "https://link.springer.com"

[crawl]
item-delay-ms = 250
min-year = 2015
update-batch-size = 50
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.crawl.item_delay_ms, 250);
    assert_eq!(config.crawl.min_year, 2015);
    assert_eq!(config.crawl.update_batch_size, 50);
    assert!(config.browser.headless);
    assert!(config.retry.attempts >= 1);
}

#[test]
fn test_load_config_rejects_bad_site_url() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[catalog]
base-url = "https://catalog.example.org"
token = "file-token"

[sites]
acm = "dl.acm.org"
mdpi = "https://www.mdpi.com"
springer = "https://link.springer.com"
"#
    )
    .unwrap();

    if std::env::var("BASE_URL_ACM").is_err() {
        assert!(load_config(file.path()).is_err());
    }
}
