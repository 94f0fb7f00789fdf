use super::extract;
use crate::browser::{wait_for_selector, Page};
use crate::crawler::TaskContext;
use crate::model::{merge_volumes, sort_volumes, Article, Issue, Keyword, Publication, PublicationUpdate, Volume};
use crate::sites::html::snapshot;
use crate::sites::Site;
use crate::url::last_path_segment;
use chrono::Datelike;
use std::time::Duration;

const SITE: Site = Site::Acm;

/// Upper bound on scroll rounds while loading the journal index
const MAX_SCROLLS: usize = 200;

/// Entries per lazily loaded block of a table of contents
const ARTICLES_PER_BLOCK: usize = 30;

/// Journal whose recent issues moved to a proceedings-style TOC path
const TASLP: &str = "taslp";
const TASLP_SINCE: i32 = 2020;

const KEYWORDS_SETTLE: Duration = Duration::from_secs(2);

/// Stores every journal of the ACM index
pub async fn journals_list(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let url = format!("{}/journals", ctx.sites().acm);
    if !ctx.open(SITE, &url).await? {
        return Ok(());
    }

    scroll_to_end(ctx.page(), ctx.settings().scroll_settle()).await;

    let publications = ctx.adapter(SITE)?.extract_publications(ctx.page()).await?;
    tracing::info!("Found {} journals", publications.len());
    ctx.catalog().store_publications(&publications).await;
    Ok(())
}

/// Fills in the first publication year and ISSN of every known journal
pub async fn publications(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(publications, |publication| fetch_publication_meta(ctx, publication))
        .await?;
    ctx.catalog().update_publications(&updates).await;
    Ok(())
}

async fn fetch_publication_meta(
    ctx: &TaskContext<'_>,
    publication: Publication,
) -> crate::Result<Option<PublicationUpdate>> {
    if !ctx.open(SITE, &publication.link).await? {
        return Ok(None);
    }

    let snapshot = snapshot(ctx.page()).await?;
    let (year_published, issn) = extract::parse_publication_meta(&snapshot);

    let mut update = PublicationUpdate::new(publication.id);
    update.year_published = year_published;
    update.issn = issn;
    Ok((!update.is_empty()).then_some(update))
}

/// Crawls the volumes and issues of every journal, year by year
pub async fn volumes_issues(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(publications, |publication| crawl_volumes(ctx, publication))
        .await?;
    ctx.catalog().update_publications(&updates).await;
    Ok(())
}

async fn crawl_volumes(
    ctx: &TaskContext<'_>,
    publication: Publication,
) -> crate::Result<Option<PublicationUpdate>> {
    let Some(code) = last_path_segment(&publication.link) else {
        tracing::warn!("Skipping {}: no journal code in link", publication.link);
        return Ok(None);
    };

    let min_year = ctx.settings().min_year;
    let start_year = match publication.year_published {
        Some(year) => year.max(min_year),
        None => match discover_start_year(ctx, &code, min_year).await? {
            Some(year) => year,
            None => {
                tracing::warn!("Skipping {}: no issues since {}", publication.link, min_year);
                return Ok(None);
            }
        },
    };

    let adapter = ctx.adapter(SITE)?;
    let mut volumes: Vec<Volume> = Vec::new();
    for year in start_year..=chrono::Utc::now().year() {
        let url = format!("{}/loi/{}/group/d{}.y{}", ctx.sites().acm, code, year - year % 10, year);
        if !ctx.open(SITE, &url).await? {
            continue;
        }

        let found: Vec<Volume> = adapter
            .extract_volumes_and_issues(ctx.page())
            .await?
            .into_iter()
            .filter(|volume| volume.year_published == Some(year))
            .collect();
        volumes = merge_volumes(volumes, found);
    }

    for volume in &mut volumes {
        volume.sort_issues_by_month();
    }
    sort_volumes(&mut volumes);

    let mut update = PublicationUpdate::new(publication.id);
    update.year_published = Some(start_year);
    update.volumes = Some(volumes);
    Ok(Some(update))
}

/// Earliest year at or after `min_year` offered by the journal's issue index
async fn discover_start_year(ctx: &TaskContext<'_>, code: &str, min_year: i32) -> crate::Result<Option<i32>> {
    let url = format!("{}/loi/{}", ctx.sites().acm, code);
    if !ctx.open(SITE, &url).await? {
        return Ok(None);
    }
    wait_for_selector(ctx.page(), ".loi__list.tab__nav.swipe__list", ctx.settings().selector_timeout()).await;

    let snapshot = snapshot(ctx.page()).await?;
    let start_year = extract::parse_start_year(&snapshot, min_year);
    ctx.pause().await;
    Ok(start_year)
}

/// Crawls and stores the articles of every stored issue
pub async fn articles_list(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    ctx.process(publications, |publication| crawl_publication_articles(ctx, publication))
        .await?;
    Ok(())
}

async fn crawl_publication_articles(ctx: &TaskContext<'_>, publication: Publication) -> crate::Result<Option<()>> {
    if publication.year_published.is_none() {
        tracing::debug!("Skipping {}: publication year unknown", publication.link);
        return Ok(None);
    }
    let Some(code) = last_path_segment(&publication.link) else {
        tracing::warn!("Skipping {}: no journal code in link", publication.link);
        return Ok(None);
    };

    let volumes = ctx.catalog().get_volumes(publication.id).await;
    let (publication, code) = (&publication, code.as_str());
    ctx.process(volumes, |volume| crawl_volume_articles(ctx, publication, code, volume))
        .await?;
    Ok(Some(()))
}

async fn crawl_volume_articles(
    ctx: &TaskContext<'_>,
    publication: &Publication,
    code: &str,
    volume: Volume,
) -> crate::Result<Option<()>> {
    let Some(year) = volume.year_published else {
        tracing::warn!("Skipping volume {} of {}: no year", volume.number, publication.link);
        return Ok(None);
    };
    let Some(issues) = ctx.catalog().get_issues(publication.id, &volume.number).await else {
        tracing::warn!("Skipping volume {} of {}: issues unavailable", volume.number, publication.link);
        return Ok(None);
    };

    let volume = &volume;
    ctx.process(issues, |issue| {
        let url = toc_url(&ctx.sites().acm, code, year, &volume.number, &issue.name);
        crawl_issue_articles(ctx, publication, volume, issue, url)
    })
    .await?;
    Ok(Some(()))
}

async fn crawl_issue_articles(
    ctx: &TaskContext<'_>,
    publication: &Publication,
    volume: &Volume,
    issue: Issue,
    url: String,
) -> crate::Result<Option<()>> {
    let articles = fetch_issue_articles(ctx, &url).await?;
    tracing::info!("Found {} articles in {}", articles.len(), url);
    ctx.catalog()
        .store_articles(&articles, publication.id, &volume.number, &issue.name)
        .await;
    Ok(Some(()))
}

/// Table-of-contents URL of an issue
///
/// TASLP lists its issues from 2020 on under the proceedings DOI prefix.
fn toc_url(base: &str, code: &str, year: i32, volume: &str, issue: &str) -> String {
    if code == TASLP && year >= TASLP_SINCE {
        format!("{}/toc/10.5555/{}.{}.issue-{}", base, code, year, volume)
    } else {
        format!("{}/toc/{}/{}/{}/{}", base, code, year, volume, issue)
    }
}

/// Opens a table of contents and extracts every research article in it
async fn fetch_issue_articles(ctx: &TaskContext<'_>, url: &str) -> crate::Result<Vec<Article>> {
    if !ctx.open(SITE, url).await? {
        return Ok(Vec::new());
    }

    let page = ctx.page();
    let timeout = ctx.settings().selector_timeout();
    show_all_articles(page, timeout).await?;
    let keywords = issue_keywords(page).await?;

    wait_for_selector(page, ".issue-item-container", timeout).await;
    let links = ctx.adapter(SITE)?.extract_article_urls(page, None).await?;

    let keywords = keywords.as_slice();
    ctx.process(links, |link| fetch_article(ctx, link, keywords)).await
}

async fn fetch_article(ctx: &TaskContext<'_>, link: String, keywords: &[Keyword]) -> crate::Result<Option<Article>> {
    if !ctx.open(SITE, &link).await? {
        return Ok(None);
    }

    let article = ctx
        .adapter(SITE)?
        .extract_article(ctx.page(), &link)
        .await
        .into_item(&link)?;
    Ok(article.map(|mut article| {
        article.keywords = keywords.to_vec();
        article
    }))
}

/// Expands a lazily loaded table of contents until every entry is present
async fn show_all_articles(page: &dyn Page, timeout: Duration) -> crate::Result<()> {
    let Some(hidden) = extract::parse_hidden_count(&snapshot(page).await?) else {
        return Ok(());
    };

    let blocks = (ARTICLES_PER_BLOCK + hidden).div_ceil(ARTICLES_PER_BLOCK);
    for _ in 1..blocks {
        if page.click(".showMoreProceedings").await.is_err() {
            break;
        }
        let loaded = wait_for_selector(
            page,
            ".proceedingsLazyLoad .table-of-content-wrapper .issue-item-container",
            timeout,
        )
        .await;
        if !loaded {
            break;
        }
    }
    Ok(())
}

/// Keywords of the issue, after expanding the collapsed tag list
async fn issue_keywords(page: &dyn Page) -> crate::Result<Vec<Keyword>> {
    if matches!(page.exists(".count-list .removed-items-count").await, Ok(true)) {
        if let Err(e) = page.click(".count-list .removed-items-count").await {
            tracing::debug!("Could not expand keywords: {}", e);
        }
        tokio::time::sleep(KEYWORDS_SETTLE).await;
    }
    Ok(extract::parse_keywords(&snapshot(page).await?))
}

/// Scrolls the document until its height stops growing
async fn scroll_to_end(page: &dyn Page, settle: Duration) {
    const HEIGHT: &str = "document.body.scrollHeight";

    let mut height = page.evaluate(HEIGHT).await.unwrap_or_default();
    for _ in 0..MAX_SCROLLS {
        if let Err(e) = page.evaluate("window.scrollTo(0, document.body.scrollHeight)").await {
            tracing::warn!("Scrolling stopped: {}", e);
            return;
        }
        tokio::time::sleep(settle).await;

        let current = page.evaluate(HEIGHT).await.unwrap_or_default();
        if current == height {
            return;
        }
        height = current;
    }
}
