//! Core types shared across hammer operations.

use octocrab::models::Repository;

/// Basic information about a repository within the organization.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Repository name, unique within one enumeration result.
    pub name: String,

    /// Login of the owning user or organization.
    pub owner_login: String,

    /// Whether the repository is archived.
    pub archived: bool,

    /// Code owners, populated by a later enrichment pass.
    pub code_owners: Vec<String>,
}

impl RepoInfo {
    /// Builds a record from the API repository model.
    pub(crate) fn from_repository(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            owner_login: repo
                .owner
                .as_ref()
                .map(|owner| owner.login.clone())
                .unwrap_or_default(),
            archived: repo.archived.unwrap_or(false),
            code_owners: Vec::new(),
        }
    }
}

/// Controls how the repository list is returned.
#[derive(Debug, Clone, Copy)]
pub struct RepoListOptions {
    /// Maximum number of repositories to return.
    pub limit: usize,

    /// Whether archived repositories are included.
    pub include_archived: bool,
}
