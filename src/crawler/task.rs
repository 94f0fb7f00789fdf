//! Registry of named crawl tasks (site × granularity)

use crate::crawler::TaskContext;
use crate::sites::{acm, mdpi, springer, Site};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A crawl task selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    MdpiJournalsList,
    MdpiPublicationsVolumes,
    MdpiIssues,
    MdpiArticles,
    MdpiUpdate,
    AcmJournalsList,
    AcmPublications,
    AcmVolumesIssues,
    AcmArticlesList,
    SpringerJournalsList,
    SpringerPublicationsVolumesIssues,
    SpringerArticlesList,
    SpringerUpdate,
}

/// Returned when a task name is not in the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported task '{0}'")]
pub struct UnknownTask(pub String);

impl Task {
    /// Every registered task, in display order
    pub const ALL: [Task; 13] = [
        Task::MdpiJournalsList,
        Task::MdpiPublicationsVolumes,
        Task::MdpiIssues,
        Task::MdpiArticles,
        Task::MdpiUpdate,
        Task::AcmJournalsList,
        Task::AcmPublications,
        Task::AcmVolumesIssues,
        Task::AcmArticlesList,
        Task::SpringerJournalsList,
        Task::SpringerPublicationsVolumesIssues,
        Task::SpringerArticlesList,
        Task::SpringerUpdate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Task::MdpiJournalsList => "mdpi_journals_list",
            Task::MdpiPublicationsVolumes => "mdpi_publications_volumes",
            Task::MdpiIssues => "mdpi_issues",
            Task::MdpiArticles => "mdpi_articles",
            Task::MdpiUpdate => "mdpi_update",
            Task::AcmJournalsList => "acm_journals_list",
            Task::AcmPublications => "acm_publications",
            Task::AcmVolumesIssues => "acm_volumes_issues",
            Task::AcmArticlesList => "acm_articles_list",
            Task::SpringerJournalsList => "springer_journals_list",
            Task::SpringerPublicationsVolumesIssues => "springer_publications_volumes_issues",
            Task::SpringerArticlesList => "springer_articles_list",
            Task::SpringerUpdate => "springer_update",
        }
    }

    pub fn site(self) -> Site {
        match self {
            Task::MdpiJournalsList
            | Task::MdpiPublicationsVolumes
            | Task::MdpiIssues
            | Task::MdpiArticles
            | Task::MdpiUpdate => Site::Mdpi,
            Task::AcmJournalsList
            | Task::AcmPublications
            | Task::AcmVolumesIssues
            | Task::AcmArticlesList => Site::Acm,
            Task::SpringerJournalsList
            | Task::SpringerPublicationsVolumesIssues
            | Task::SpringerArticlesList
            | Task::SpringerUpdate => Site::Springer,
        }
    }

    /// Comma-separated list of every task name
    pub fn names() -> String {
        Task::ALL
            .iter()
            .map(|task| task.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Runs the task's orchestrator against the given context
    pub async fn run(self, ctx: &TaskContext<'_>) -> crate::Result<()> {
        match self {
            Task::MdpiJournalsList => mdpi::journals_list(ctx).await,
            Task::MdpiPublicationsVolumes => mdpi::publications_volumes(ctx).await,
            Task::MdpiIssues => mdpi::issues(ctx).await,
            Task::MdpiArticles => mdpi::articles(ctx).await,
            Task::MdpiUpdate => mdpi::update(ctx).await,
            Task::AcmJournalsList => acm::journals_list(ctx).await,
            Task::AcmPublications => acm::publications(ctx).await,
            Task::AcmVolumesIssues => acm::volumes_issues(ctx).await,
            Task::AcmArticlesList => acm::articles_list(ctx).await,
            Task::SpringerJournalsList => springer::journals_list(ctx).await,
            Task::SpringerPublicationsVolumesIssues => springer::publications_volumes_issues(ctx).await,
            Task::SpringerArticlesList => springer::articles_list(ctx).await,
            Task::SpringerUpdate => springer::update(ctx).await,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|task| task.name() == s)
            .ok_or_else(|| UnknownTask(s.to_string()))
    }
}
