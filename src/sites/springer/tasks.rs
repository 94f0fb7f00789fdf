use super::{extract, CRAWLED_DOMAINS};
use crate::browser::wait_for_selector;
use crate::crawler::{diff_from_cursor, exclude_known, TaskContext};
use crate::model::{compare_keys, Article, Issue, IssueCursor, NewPublication, Publication, PublicationUpdate, RecentPublication, Volume};
use crate::sites::html::snapshot;
use crate::sites::Site;
use crate::url::domain_allowed;
use std::cmp::Ordering;

const SITE: Site = Site::Springer;

fn browse_url(base: &str, page: usize) -> String {
    format!("{}/journals/browse-subject?subject=COMPUTER_SCIENCE&sortBy=&page={}", base, page)
}

fn volumes_url(link: &str) -> String {
    format!("{}/volumes-and-issues", link.trim_end_matches('/'))
}

fn issue_url(link: &str, volume: &str, issue: &str) -> String {
    format!("{}/{}-{}", volumes_url(link), volume, issue)
}

/// Stores every journal of the computer-science subject browser
pub async fn journals_list(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let base = ctx.sites().springer.as_str();
    if !ctx.open(SITE, &browse_url(base, 1)).await? {
        return Ok(());
    }

    let total_pages = extract::parse_total_pages(&snapshot(ctx.page()).await?);
    tracing::info!("Subject browser has {} pages", total_pages);

    let pages = ctx
        .process(1..=total_pages, |number| read_browse_page(ctx, base, number))
        .await?;
    let publications: Vec<NewPublication> = pages.into_iter().flatten().collect();

    tracing::info!("Found {} journals", publications.len());
    ctx.catalog().store_publications(&publications).await;
    Ok(())
}

async fn read_browse_page(
    ctx: &TaskContext<'_>,
    base: &str,
    number: usize,
) -> crate::Result<Option<Vec<NewPublication>>> {
    // page 1 is already loaded
    if number > 1 && !ctx.open(SITE, &browse_url(base, number)).await? {
        return Ok(None);
    }
    let publications = ctx.adapter(SITE)?.extract_publications(ctx.page()).await?;
    Ok(Some(publications))
}

/// Crawls ISSN, start year, volumes and issues of every Springer Link journal
pub async fn publications_volumes_issues(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(publications, |publication| crawl_publication(ctx, publication))
        .await?;
    send_in_batches(ctx, &updates).await;
    Ok(())
}

async fn crawl_publication(ctx: &TaskContext<'_>, publication: Publication) -> crate::Result<Option<PublicationUpdate>> {
    if !domain_allowed(&publication.link, &CRAWLED_DOMAINS) {
        tracing::debug!("Skipping {}: not hosted on Springer Link", publication.link);
        return Ok(None);
    }
    if !ctx.open(SITE, &publication.link).await? {
        return Ok(None);
    }
    let issn = extract::parse_issn(&snapshot(ctx.page()).await?);

    let Some((volumes, year_published)) = read_volumes_page(ctx, &publication.link).await? else {
        return Ok(None);
    };

    let mut update = PublicationUpdate::new(publication.id);
    update.issn = issn;
    update.year_published = year_published;
    update.volumes = Some(volumes);
    Ok(Some(update))
}

/// Volumes since the minimum year and the journal's first year
async fn read_volumes_page(ctx: &TaskContext<'_>, link: &str) -> crate::Result<Option<(Vec<Volume>, Option<i32>)>> {
    if !ctx.open(SITE, &volumes_url(link)).await? {
        return Ok(None);
    }

    let volumes = ctx.adapter(SITE)?.extract_volumes_and_issues(ctx.page()).await?;
    let year_published = extract::parse_year_published(&snapshot(ctx.page()).await?);
    Ok(Some((volumes, year_published)))
}

/// Sends updates in configured batches, pausing between batches
async fn send_in_batches(ctx: &TaskContext<'_>, updates: &[PublicationUpdate]) {
    let size = ctx.settings().update_batch_size.max(1);
    for (index, batch) in updates.chunks(size).enumerate() {
        let from = index * size;
        ctx.catalog().update_publications(batch).await;
        tracing::info!("Updated publications {} to {}", from, from + batch.len());
        ctx.pause().await;
    }
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
    let volumes = ctx.catalog().get_volumes(publication.id).await;
    let publication = &publication;
    ctx.process(volumes, |volume| crawl_volume_articles(ctx, publication, volume))
        .await?;
    Ok(Some(()))
}

async fn crawl_volume_articles(ctx: &TaskContext<'_>, publication: &Publication, volume: Volume) -> crate::Result<Option<()>> {
    let Some(issues) = ctx.catalog().get_issues(publication.id, &volume.number).await else {
        tracing::warn!("Skipping volume {} of {}: issues unavailable", volume.number, publication.link);
        return Ok(None);
    };

    let number = volume.number.as_str();
    ctx.process(issues, |issue| store_issue_articles(ctx, publication, number, issue))
        .await?;
    Ok(Some(()))
}

async fn store_issue_articles(
    ctx: &TaskContext<'_>,
    publication: &Publication,
    volume: &str,
    issue: Issue,
) -> crate::Result<Option<()>> {
    let url = issue_url(&publication.link, volume, &issue.name);
    let articles = fetch_issue_articles(ctx, &url, &[]).await?;
    tracing::info!("Found {} articles in {}", articles.len(), url);
    ctx.catalog()
        .store_articles(&articles, publication.id, volume, &issue.name)
        .await;
    Ok(Some(()))
}

/// Opens an issue page and extracts the articles not listed in `known`
async fn fetch_issue_articles(ctx: &TaskContext<'_>, url: &str, known: &[&str]) -> crate::Result<Vec<Article>> {
    if !ctx.open(SITE, url).await? {
        return Ok(Vec::new());
    }
    wait_for_selector(ctx.page(), ".u-list-reset .app-card-open", ctx.settings().selector_timeout()).await;

    let links = ctx.adapter(SITE)?.extract_article_urls(ctx.page(), None).await?;
    let links = exclude_known(links, known.iter().copied());
    ctx.process(links, |link| fetch_article(ctx, link)).await
}

async fn fetch_article(ctx: &TaskContext<'_>, link: String) -> crate::Result<Option<Article>> {
    if !ctx.open(SITE, &link).await? {
        return Ok(None);
    }
    ctx.adapter(SITE)?
        .extract_article(ctx.page(), &link)
        .await
        .into_item(&link)
}

/// Refreshes the journal list, then crawls everything after each cursor
///
/// In the cursor volume only issues named at or after the cursor issue are
/// revisited, and articles already stored under the cursor issue are not
/// fetched again.
pub async fn update(ctx: &TaskContext<'_>) -> crate::Result<()> {
    journals_list(ctx).await?;

    let Some(recent) = ctx.catalog().get_recent(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(recent, |publication| crawl_recent(ctx, publication))
        .await?;
    send_in_batches(ctx, &updates).await;
    Ok(())
}

async fn crawl_recent(ctx: &TaskContext<'_>, recent: RecentPublication) -> crate::Result<Option<PublicationUpdate>> {
    let link = recent.publication.link.as_str();
    if !domain_allowed(link, &CRAWLED_DOMAINS) {
        return Ok(None);
    }
    let Some((observed, _)) = read_volumes_page(ctx, link).await? else {
        return Ok(None);
    };

    let cursor = recent.recent_volume.clone();
    let cursor_number = cursor.as_ref().map(|volume| volume.number.clone());
    let volumes = diff_from_cursor(observed, cursor, |volume| volume.number.as_str());

    let recent = &recent;
    let volumes = ctx
        .process(volumes, |volume| {
            let at_cursor = cursor_number
                .as_deref()
                .map_or(false, |number| compare_keys(number, &volume.number) == Ordering::Equal);
            crawl_new_volume(ctx, recent, volume, at_cursor)
        })
        .await?;

    if volumes.is_empty() {
        tracing::debug!("Nothing new for {}", link);
        return Ok(None);
    }
    let mut update = PublicationUpdate::new(recent.publication.id);
    update.volumes = Some(volumes);
    Ok(Some(update))
}

async fn crawl_new_volume(
    ctx: &TaskContext<'_>,
    recent: &RecentPublication,
    volume: Volume,
    at_cursor: bool,
) -> crate::Result<Option<Volume>> {
    let issue_cursor = if at_cursor {
        recent.recent_issue.as_ref().map(IssueCursor::to_issue)
    } else {
        None
    };
    let issues = diff_from_cursor(volume.issues, issue_cursor, |issue| issue.name.as_str());
    if issues.is_empty() {
        return Ok(None);
    }

    let known: Vec<&str> = recent
        .recent_issue
        .as_ref()
        .map(|cursor| cursor.known_links().collect())
        .unwrap_or_default();
    let (link, number, known) = (recent.publication.link.as_str(), volume.number.as_str(), known.as_slice());
    let issues = ctx
        .process(issues, |issue| fetch_new_issue(ctx, link, number, issue, known))
        .await?;

    Ok(Some(Volume {
        number: volume.number.clone(),
        year_published: volume.year_published,
        issues,
    }))
}

async fn fetch_new_issue(
    ctx: &TaskContext<'_>,
    link: &str,
    volume: &str,
    issue: Issue,
    known: &[&str],
) -> crate::Result<Option<Issue>> {
    let url = issue_url(link, volume, &issue.name);
    let articles = fetch_issue_articles(ctx, &url, known).await?;
    Ok(Some(Issue { articles, ..issue }))
}
