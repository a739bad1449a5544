//! Organization repository enumeration.
//!
//! Walks the paginated organization repository listing, filtering archived
//! repositories per option and stopping at the configured limit.

use crate::config::HammerConfig;
use crate::types::{RepoInfo, RepoListOptions};
use octocrab::models::Repository;
use octocrab::Octocrab;
use thiserror::Error;
use tracing::{debug, info};

/// Repositories requested per page of the organization listing.
const REPOS_PER_PAGE: u8 = 25;

/// Errors that can occur while enumerating repositories.
#[derive(Debug, Error)]
pub enum ListError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),
}

/// Enumerates the organization's repositories.
///
/// Issues successive page requests against the organization's repository
/// collection, skipping archived repositories unless
/// [`RepoListOptions::include_archived`] is set. Stops as soon as the
/// accumulated count reaches [`RepoListOptions::limit`], even mid-page.
///
/// # Errors
///
/// Any transport or authorization error aborts immediately and is
/// propagated to the caller. No partial results are swallowed, no request
/// is retried.
pub async fn list_repositories(
    octocrab: &Octocrab,
    config: &HammerConfig,
    options: &RepoListOptions,
) -> Result<Vec<RepoInfo>, ListError> {
    let mut repo_list = Vec::new();

    let mut page = octocrab
        .orgs(config.organization())
        .list_repos()
        .per_page(REPOS_PER_PAGE)
        .send()
        .await?;

    loop {
        let records = page.items.iter().map(RepoInfo::from_repository);
        if collect_page(&mut repo_list, records, options) {
            debug!(limit = options.limit, "Repository limit reached");
            break;
        }

        match octocrab.get_page::<Repository>(&page.next).await? {
            Some(next_page) => page = next_page,
            None => break,
        }
    }

    info!(count = repo_list.len(), "Enumerated repositories");
    Ok(repo_list)
}

/// Appends one page of records to the accumulator.
///
/// Returns `true` once the limit has been reached, at which point the
/// caller must stop fetching further pages.
fn collect_page(
    accumulated: &mut Vec<RepoInfo>,
    records: impl IntoIterator<Item = RepoInfo>,
    options: &RepoListOptions,
) -> bool {
    for record in records {
        if accumulated.len() >= options.limit {
            return true;
        }

        if !options.include_archived && record.archived {
            continue;
        }

        accumulated.push(record);
    }

    accumulated.len() >= options.limit
}
