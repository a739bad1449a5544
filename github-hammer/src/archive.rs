//! Bulk repository archiving.

use crate::config::HammerConfig;
use crate::repos::{list_repositories, ListError};
use crate::types::RepoListOptions;
use octocrab::models::Repository;
use octocrab::Octocrab;
use serde_json::json;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while archiving repositories.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Repository enumeration failed.
    #[error(transparent)]
    List(#[from] ListError),

    /// Failed to read the archive target file.
    #[error("Failed to read archive list '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Neither a file nor an argument list was supplied.
    #[error("Must either supply a file, or list of repos to archive")]
    NoTargets,
}

/// Loads the archive target list from a file or from arguments.
///
/// The file holds one repository name per line; blank lines are ignored.
/// Arguments are used as-is when no file is given.
///
/// # Errors
///
/// Returns [`ArchiveError::NoTargets`] when neither source is supplied,
/// or [`ArchiveError::IoError`] when the file cannot be read.
pub fn load_archive_targets(
    file: Option<&Path>,
    args: &[String],
) -> Result<Vec<String>, ArchiveError> {
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|source| ArchiveError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    } else if args.is_empty() {
        Err(ArchiveError::NoTargets)
    } else {
        Ok(args.to_vec())
    }
}

/// Archives every enumerated repository whose name appears in `targets`.
///
/// Matching is case-sensitive exact comparison on the repository name.
/// Target names that match nothing in the enumeration are logged as
/// warnings rather than failing the command.
///
/// # Errors
///
/// Fails fast on the first API error; repositories already archived in
/// this run stay archived.
pub async fn run_archive(
    octocrab: &Octocrab,
    config: &HammerConfig,
    options: &RepoListOptions,
    targets: &[String],
) -> Result<(), ArchiveError> {
    let repo_list = list_repositories(octocrab, config, options).await?;

    for repo in &repo_list {
        if !targets.iter().any(|target| target == &repo.name) {
            continue;
        }

        info!(repo = %repo.name, "Archiving repository");
        println!("archiving: {}", repo.name);
        archive_repository(octocrab, config.organization(), &repo.name).await?;
    }

    for target in targets {
        if !repo_list.iter().any(|repo| &repo.name == target) {
            warn!(target = %target, "No enumerated repository matched this archive target");
        }
    }

    Ok(())
}

/// Sets the archived flag on a single repository.
async fn archive_repository(
    octocrab: &Octocrab,
    owner: &str,
    name: &str,
) -> Result<(), ArchiveError> {
    let route = format!("/repos/{owner}/{name}");
    let _repo: Repository = octocrab
        .patch(route, Some(&json!({ "archived": true })))
        .await?;
    Ok(())
}
