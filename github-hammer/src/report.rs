//! Vulnerability triage report.
//!
//! Formats accumulated alert and owner data as text blocks suitable for
//! pasting straight into a document.

use crate::alerts::{fetch_alerts, AlertError, VulnerabilityAlert};
use crate::code_owners::{resolve_code_owners, CodeOwnersError};
use crate::config::HammerConfig;
use crate::repos::{list_repositories, ListError};
use crate::types::{RepoInfo, RepoListOptions};
use octocrab::Octocrab;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while generating the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Repository enumeration failed.
    #[error(transparent)]
    List(#[from] ListError),

    /// Code-owner resolution failed.
    #[error(transparent)]
    CodeOwners(#[from] CodeOwnersError),

    /// Vulnerability alert fetch failed.
    #[error(transparent)]
    Alerts(#[from] AlertError),
}

/// Generates the vulnerability report and prints it to standard output.
///
/// Enumerates the organization's repositories, enriches each record with
/// code owners, then fetches and renders alerts one repository at a time.
/// Output is interleaved with processing, not buffered, so blocks already
/// printed remain visible even when a later repository fails.
///
/// # Errors
///
/// The first error from any stage aborts the whole report.
pub async fn run_report(
    octocrab: &Octocrab,
    config: &HammerConfig,
    options: &RepoListOptions,
) -> Result<(), ReportError> {
    let mut repo_list = list_repositories(octocrab, config, options).await?;

    // Enrichment pass: code owners are resolved after enumeration.
    for repo in repo_list.iter_mut() {
        repo.code_owners = resolve_code_owners(octocrab, &repo.name, &repo.owner_login).await?;
    }

    info!(count = repo_list.len(), "Fetching vulnerability alerts");

    for repo in &repo_list {
        let report = fetch_alerts(octocrab, &repo.name, &repo.owner_login).await?;
        if let Some(block) = render_repo_report(repo, report.description.as_deref(), &report.alerts)
        {
            print!("{block}");
        }
    }

    Ok(())
}

/// Renders the report block for one repository.
///
/// Returns `None` when the alert sequence is empty: repositories with zero
/// alerts do not appear in the report at all. Dismissed alerts were fetched
/// but are excluded from the rendered lines.
pub fn render_repo_report(
    repo: &RepoInfo,
    description: Option<&str>,
    alerts: &[VulnerabilityAlert],
) -> Option<String> {
    if alerts.is_empty() {
        return None;
    }

    let code_owners = if repo.code_owners.is_empty() {
        "none".to_string()
    } else {
        repo.code_owners.join(",")
    };

    let mut block = String::new();
    block.push_str(&format!("\n## Repository: {}\n", repo.name));
    block.push_str(&format!(
        "**Description**: {}\n",
        description.unwrap_or_default()
    ));
    block.push_str(&format!("**Code Owners**: {code_owners}\n"));

    for alert in alerts.iter().filter(|alert| alert.is_active()) {
        block.push_str(&format!(
            "* `{}` {} `{}` `{}` {}\n",
            alert.package_ecosystem,
            alert.package_name,
            alert.vulnerable_version_range,
            alert.severity,
            alert.advisory_references.join(" , ")
        ));
    }

    block.push_str("---\n");
    Some(block)
}
