//! Vulnerability scanner enablement.

use crate::config::HammerConfig;
use crate::repos::{list_repositories, ListError};
use crate::types::RepoListOptions;
use octocrab::Octocrab;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while enabling vulnerability scanning.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Repository enumeration failed.
    #[error(transparent)]
    List(#[from] ListError),
}

/// Enables vulnerability alerts for every enumerated repository.
///
/// Progress is reported per repository; the first API error aborts the
/// remainder of the run.
pub async fn run_scanner(
    octocrab: &Octocrab,
    config: &HammerConfig,
    options: &RepoListOptions,
) -> Result<(), ScannerError> {
    let repo_list = list_repositories(octocrab, config, options).await?;

    for repo in &repo_list {
        enable_vulnerability_alerts(octocrab, &repo.owner_login, &repo.name).await?;
        info!(repo = %repo.name, "Enabled vulnerability alerts");
        println!("Vulnerability alerts are enabled for: {}", repo.name);
    }

    Ok(())
}

/// Enables vulnerability alerts for a single repository.
///
/// The endpoint responds with 204 and no body, so the raw transport call
/// is used instead of a typed response.
async fn enable_vulnerability_alerts(
    octocrab: &Octocrab,
    owner: &str,
    name: &str,
) -> Result<(), ScannerError> {
    let route = format!("/repos/{owner}/{name}/vulnerability-alerts");
    let response = octocrab._put(route, None::<&()>).await?;
    octocrab::map_github_error(response).await?;
    Ok(())
}
