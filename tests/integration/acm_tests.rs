//! ACM orchestrators against pre-loaded pages and an in-memory catalog

use crate::support::{article_links, publication, test_config, RecordingCatalog, ACM};
use catalog_crawler::browser::StaticPage;
use catalog_crawler::crawler::TaskContext;
use catalog_crawler::model::{Issue, Keyword, Volume};
use catalog_crawler::Task;

const JOURNAL: &str = "https://dl.acm.org/journal/tocs";

#[tokio::test]
async fn test_journals_list_after_scrolling() {
    let page = StaticPage::new().with_document(
        format!("{}/journals", ACM),
        r#"<li class="search__item"><div class="search__item-title"><a href="/journal/tocs"><span class="browse-title">ACM Transactions on Computer Systems</span></a></div></li>"#,
    );
    let catalog = RecordingCatalog::default();
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::AcmJournalsList.run(&ctx).await.unwrap();

    let stored = catalog.stored_publications();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].link, JOURNAL);
}

#[tokio::test]
async fn test_publications_reads_year_and_issn() {
    let page = StaticPage::new().with_document(
        JOURNAL,
        r#"<div class="bibliometrics__block"><div class="bibliometrics__title">Publication Years</div>
             <div class="bibliometrics__count"><span>1983 - 2024</span></div></div>
           <div class="toc-badge__row">ISSN <span class="toc-badge__value">0734-2071</span></div>"#,
    );
    let catalog = RecordingCatalog {
        publications: vec![publication(4, JOURNAL, None, None)],
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::AcmPublications.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].year_published, Some(1983));
    assert_eq!(updates[0].issn.as_deref(), Some("0734-2071"));
}

#[tokio::test]
async fn test_volumes_issues_discovers_start_year() {
    let page = StaticPage::new()
        .with_document(
            format!("{}/loi/tocs", ACM),
            r#"<ul class="loi__list tab__nav swipe__list">
                 <li><a aria-label="select year 2015">2015</a></li>
                 <li><a aria-label="select year 2008">2008</a></li>
                 <li><a aria-label="select year 2012">2012</a></li>
               </ul>"#,
        )
        .with_document(
            format!("{}/loi/tocs/group/d2010.y2012", ACM),
            r#"<div class="loi__vol-title left-bordered-title">2012, Volume 30</div>
               <ul>
                 <li class="loi__issue"><span class="coverDate">November 2012</span><span class="issue">Issue 4</span></li>
                 <li class="loi__issue"><span class="coverDate">February 2012</span><span class="issue">Issue 1</span></li>
               </ul>
               <div class="loi__vol-title left-bordered-title">2011, Volume 29</div>
               <ul><li class="loi__issue"><span class="coverDate">May 2011</span><span class="issue">Issue 2</span></li></ul>"#,
        );
    let catalog = RecordingCatalog {
        publications: vec![publication(4, JOURNAL, None, None)],
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::AcmVolumesIssues.run(&ctx).await.unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].year_published, Some(2012));

    let volumes = updates[0].volumes.as_ref().unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].number, "30");
    assert_eq!(volumes[0].issues, vec![Issue::new("1", "2"), Issue::new("4", "11")]);

    // years without a list-of-issues page are skipped, not fatal
    assert!(page
        .visits()
        .contains(&format!("{}/loi/tocs/group/d2010.y2013", ACM)));
}

#[tokio::test]
async fn test_articles_list_applies_issue_keywords() {
    let page = StaticPage::new()
        .with_document(
            format!("{}/toc/tocs/2012/30/4", ACM),
            r#"<div class="tags-widget__content"><ul><li><a>Consensus</a></li></ul></div>
               <div class="issue-item-container">
                 <div class="issue-item__citation"><span class="issue-heading">Research-Article</span></div>
                 <h5 class="issue-item__title"><a href="/doi/10.1145/1">Fast Consensus</a></h5>
               </div>
               <div class="issue-item-container">
                 <div class="issue-item__citation"><span class="issue-heading">Editorial</span></div>
                 <h5 class="issue-item__title"><a href="/doi/10.1145/2">From the editors</a></h5>
               </div>"#,
        )
        .with_document(
            format!("{}/doi/10.1145/1", ACM),
            r#"<h1 property="name">Fast Consensus</h1>"#,
        );
    let catalog = RecordingCatalog {
        publications: vec![
            publication(4, JOURNAL, None, Some(1983)),
            publication(5, "https://dl.acm.org/journal/new", None, None),
        ],
        volumes: [(4, vec![Volume::new("30", Some(2012))])].into_iter().collect(),
        issues: [((4, "30".to_string()), vec![Issue::new("4", "11")])]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let config = test_config("http://catalog.test");
    let ctx = TaskContext::new(&page, &catalog, &config);

    Task::AcmArticlesList.run(&ctx).await.unwrap();

    let stored = catalog.stored_articles();
    assert_eq!(stored.len(), 1);
    let (publication_id, volume, issue, articles) = &stored[0];
    assert_eq!((*publication_id, volume.as_str(), issue.as_str()), (4, "30", "4"));
    assert_eq!(article_links(articles), vec!["https://dl.acm.org/doi/10.1145/1"]);
    assert_eq!(articles[0].keywords, vec![Keyword::new("consensus")]);
}
