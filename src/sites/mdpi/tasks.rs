use super::extract;
use crate::crawler::{diff_from_cursor, TaskContext};
use crate::model::{compare_keys, Article, Issue, IssueCursor, Publication, PublicationUpdate, RecentPublication, Volume};
use crate::sites::html::snapshot;
use crate::sites::Site;
use std::cmp::Ordering;

const SITE: Site = Site::Mdpi;

/// Stores every journal of the computer-science subject table
pub async fn journals_list(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let url = format!("{}/subject/computer-math", ctx.sites().mdpi);
    if !ctx.open(SITE, &url).await? {
        return Ok(());
    }

    let publications = ctx.adapter(SITE)?.extract_publications(ctx.page()).await?;
    tracing::info!("Found {} journals", publications.len());
    ctx.catalog().store_publications(&publications).await;
    Ok(())
}

/// Updates every journal's description and volume list
pub async fn publications_volumes(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(publications, |publication| fetch_publication_volumes(ctx, publication))
        .await?;
    ctx.catalog().update_publications(&updates).await;
    Ok(())
}

async fn fetch_publication_volumes(
    ctx: &TaskContext<'_>,
    publication: Publication,
) -> crate::Result<Option<PublicationUpdate>> {
    let Some((description, volumes)) = read_journal_page(ctx, &publication.link).await? else {
        return Ok(None);
    };

    let mut update = PublicationUpdate::new(publication.id);
    update.description = description;
    update.volumes = Some(volumes);
    Ok(Some(update))
}

/// Description and volumes shown on a journal's home page
async fn read_journal_page(ctx: &TaskContext<'_>, link: &str) -> crate::Result<Option<(Option<String>, Vec<Volume>)>> {
    if !ctx.open(SITE, link).await? {
        return Ok(None);
    }

    let description = extract::parse_description(&snapshot(ctx.page()).await?);
    let volumes = ctx.adapter(SITE)?.extract_volumes_and_issues(ctx.page()).await?;
    Ok(Some((description, volumes)))
}

/// Crawls the issues of every stored volume
pub async fn issues(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(publications, |publication| crawl_publication_issues(ctx, publication))
        .await?;
    ctx.catalog().update_publications(&updates).await;
    Ok(())
}

async fn crawl_publication_issues(
    ctx: &TaskContext<'_>,
    publication: Publication,
) -> crate::Result<Option<PublicationUpdate>> {
    let Some(issn) = publication.issn.as_deref() else {
        tracing::warn!("Skipping {}: no ISSN", publication.link);
        return Ok(None);
    };

    let volumes = ctx.catalog().get_volumes(publication.id).await;
    let volumes = ctx
        .process(volumes, |volume| fetch_volume_issues(ctx, issn, volume))
        .await?;

    let mut update = PublicationUpdate::new(publication.id);
    update.volumes = Some(volumes);
    Ok(Some(update))
}

async fn fetch_volume_issues(ctx: &TaskContext<'_>, issn: &str, volume: Volume) -> crate::Result<Option<Volume>> {
    let url = format!("{}/{}/{}", ctx.sites().mdpi, issn, volume.number);
    if !ctx.open(SITE, &url).await? {
        return Ok(None);
    }

    let issues = ctx.adapter(SITE)?.extract_issues(ctx.page()).await?;
    Ok(Some(Volume { issues, ..volume }))
}

/// Crawls and stores the articles of every stored issue
pub async fn articles(ctx: &TaskContext<'_>) -> crate::Result<()> {
    let Some(publications) = ctx.catalog().get_publications(SITE).await else {
        return Ok(());
    };

    ctx.process(publications, |publication| crawl_publication_articles(ctx, publication))
        .await?;
    Ok(())
}

async fn crawl_publication_articles(ctx: &TaskContext<'_>, publication: Publication) -> crate::Result<Option<()>> {
    let Some(issn) = publication.issn.as_deref() else {
        tracing::warn!("Skipping {}: no ISSN", publication.link);
        return Ok(None);
    };

    let volumes = ctx.catalog().get_volumes(publication.id).await;
    let publication = &publication;
    ctx.process(volumes, |volume| crawl_volume_articles(ctx, publication, issn, volume))
        .await?;
    Ok(Some(()))
}

async fn crawl_volume_articles(
    ctx: &TaskContext<'_>,
    publication: &Publication,
    issn: &str,
    volume: Volume,
) -> crate::Result<Option<()>> {
    let Some(issues) = ctx.catalog().get_issues(publication.id, &volume.number).await else {
        tracing::warn!("Skipping volume {} of {}: issues unavailable", volume.number, publication.link);
        return Ok(None);
    };

    let number = volume.number.as_str();
    ctx.process(issues, |issue| store_issue_articles(ctx, publication.id, issn, number, issue))
        .await?;
    Ok(Some(()))
}

async fn store_issue_articles(
    ctx: &TaskContext<'_>,
    publication_id: i64,
    issn: &str,
    volume: &str,
    issue: Issue,
) -> crate::Result<Option<()>> {
    let url = format!("{}/{}/{}/{}", ctx.sites().mdpi, issn, volume, issue.name);
    let articles = fetch_issue_articles(ctx, &url, None).await?;
    tracing::info!("Found {} articles in {}", articles.len(), url);
    ctx.catalog()
        .store_articles(&articles, publication_id, volume, &issue.name)
        .await;
    Ok(Some(()))
}

/// Opens an issue page and extracts its articles with ids `>= min_id`
async fn fetch_issue_articles(ctx: &TaskContext<'_>, url: &str, min_id: Option<u64>) -> crate::Result<Vec<Article>> {
    if !ctx.open(SITE, url).await? {
        return Ok(Vec::new());
    }

    let links = ctx.adapter(SITE)?.extract_article_urls(ctx.page(), min_id).await?;
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
/// The cursor volume is revisited with its issue cursor and the article id
/// floor; later volumes are crawled in full.
pub async fn update(ctx: &TaskContext<'_>) -> crate::Result<()> {
    journals_list(ctx).await?;

    let Some(recent) = ctx.catalog().get_recent(SITE).await else {
        return Ok(());
    };

    let updates = ctx
        .process(recent, |publication| crawl_recent(ctx, publication))
        .await?;
    ctx.catalog().update_publications(&updates).await;
    Ok(())
}

async fn crawl_recent(ctx: &TaskContext<'_>, recent: RecentPublication) -> crate::Result<Option<PublicationUpdate>> {
    let publication = &recent.publication;
    let Some(issn) = publication.issn.as_deref() else {
        tracing::warn!("Skipping {}: no ISSN", publication.link);
        return Ok(None);
    };
    let Some((_, observed)) = read_journal_page(ctx, &publication.link).await? else {
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
            crawl_new_volume(ctx, recent, issn, volume, at_cursor)
        })
        .await?;

    if volumes.is_empty() {
        return Ok(None);
    }
    let mut update = PublicationUpdate::new(recent.publication.id);
    update.volumes = Some(volumes);
    Ok(Some(update))
}

async fn crawl_new_volume(
    ctx: &TaskContext<'_>,
    recent: &RecentPublication,
    issn: &str,
    volume: Volume,
    at_cursor: bool,
) -> crate::Result<Option<Volume>> {
    let url = format!("{}/{}/{}", ctx.sites().mdpi, issn, volume.number);
    if !ctx.open(SITE, &url).await? {
        return Ok(None);
    }

    let observed: Vec<Issue> = ctx
        .adapter(SITE)?
        .extract_issues(ctx.page())
        .await?
        .into_iter()
        .filter(Issue::is_valid)
        .collect();

    let (issue_cursor, min_id) = if at_cursor {
        (
            recent.recent_issue.as_ref().map(IssueCursor::to_issue),
            recent.next_article_id(),
        )
    } else {
        (None, None)
    };
    let issues = diff_from_cursor(observed, issue_cursor, |issue| issue.month_published.as_str());

    let number = volume.number.as_str();
    let issues = ctx
        .process(issues, |issue| fetch_new_issue(ctx, issn, number, issue, min_id))
        .await?;

    Ok(Some(Volume {
        number: volume.number.clone(),
        year_published: volume.year_published,
        issues,
    }))
}

async fn fetch_new_issue(
    ctx: &TaskContext<'_>,
    issn: &str,
    volume: &str,
    issue: Issue,
    min_id: Option<u64>,
) -> crate::Result<Option<Issue>> {
    let url = format!("{}/{}/{}/{}", ctx.sites().mdpi, issn, volume, issue.name);
    let articles = fetch_issue_articles(ctx, &url, min_id).await?;
    Ok(Some(Issue { articles, ..issue }))
}
