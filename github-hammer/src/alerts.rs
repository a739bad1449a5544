//! Vulnerability alert retrieval via the GitHub GraphQL API.
//!
//! A single parameterized query fetches the vulnerability-alert connection
//! for a repository; the cursor variable is null for the first page and
//! carries the previous end cursor for every follow-up page.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Alert nodes requested per page.
const ALERTS_PER_PAGE: u32 = 10;

/// The vulnerability-alert query, parameterized over the page cursor.
const ALERTS_QUERY: &str = r#"
query($owner: String!, $name: String!, $count: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    name
    description
    vulnerabilityAlerts(first: $count, after: $cursor) {
      pageInfo {
        startCursor
        hasNextPage
        endCursor
      }
      nodes {
        dismissedAt
        dismissReason
        securityVulnerability {
          severity
          vulnerableVersionRange
          package {
            ecosystem
            name
          }
          advisory {
            summary
            references {
              url
            }
          }
        }
      }
    }
  }
}"#;

/// Errors that can occur while fetching vulnerability alerts.
#[derive(Debug, Error)]
pub enum AlertError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The GraphQL layer reported query errors.
    #[error("GraphQL query failed for repo '{repo}': {message}")]
    QueryError { repo: String, message: String },

    /// The response carried no repository data.
    #[error("No repository data returned for repo '{repo}'")]
    MissingData { repo: String },
}

/// A single vulnerability alert attached to a repository.
#[derive(Debug, Clone)]
pub struct VulnerabilityAlert {
    /// When the alert was dismissed; `None` for active alerts.
    pub dismissed_at: Option<DateTime<Utc>>,

    /// Reason given when the alert was dismissed.
    pub dismiss_reason: Option<String>,

    /// Package ecosystem the vulnerable dependency belongs to.
    pub package_ecosystem: String,

    /// Name of the vulnerable package.
    pub package_name: String,

    /// Version range the advisory applies to.
    pub vulnerable_version_range: String,

    /// Advisory severity.
    pub severity: String,

    /// Advisory summary.
    pub advisory_summary: String,

    /// Advisory reference URLs, in advisory order.
    pub advisory_references: Vec<String>,
}

impl VulnerabilityAlert {
    /// Returns `true` when the alert has not been dismissed.
    pub fn is_active(&self) -> bool {
        self.dismissed_at.is_none()
    }
}

/// All vulnerability alerts fetched for one repository.
#[derive(Debug, Clone)]
pub struct RepoVulnerabilityReport {
    /// Repository description, as reported by the query.
    pub description: Option<String>,

    /// Every alert node, active and dismissed, in the order received.
    pub alerts: Vec<VulnerabilityAlert>,
}

/// Pagination metadata for the alert connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Cursor of the first node in this page.
    pub start_cursor: Option<String>,

    /// Whether another page follows this one.
    pub has_next_page: bool,

    /// Cursor to supply when requesting the next page.
    pub end_cursor: Option<String>,
}

/// Fetches every vulnerability alert for a repository.
///
/// Issues the first-page query, then repeatedly issues the same query with
/// the last end cursor while the connection reports a next page,
/// accumulating alert nodes in the order received.
///
/// # Errors
///
/// Query failure at any step aborts and propagates; no partial report is
/// produced for a broken repository.
pub async fn fetch_alerts(
    octocrab: &Octocrab,
    repo_name: &str,
    owner_login: &str,
) -> Result<RepoVulnerabilityReport, AlertError> {
    let page = query_alert_page(octocrab, repo_name, owner_login, None).await?;

    let description = page.description;
    let mut alerts = page.alerts;
    let mut page_info = page.page_info;

    while page_info.has_next_page {
        let next = query_alert_page(
            octocrab,
            repo_name,
            owner_login,
            page_info.end_cursor.as_deref(),
        )
        .await?;

        alerts.extend(next.alerts);
        page_info = next.page_info;
    }

    debug!(repo = %repo_name, count = alerts.len(), "Fetched vulnerability alerts");
    Ok(RepoVulnerabilityReport {
        description,
        alerts,
    })
}

/// One page of the vulnerability-alert connection.
struct AlertPage {
    description: Option<String>,
    alerts: Vec<VulnerabilityAlert>,
    page_info: PageInfo,
}

/// Issues the alert query for one page.
async fn query_alert_page(
    octocrab: &Octocrab,
    repo_name: &str,
    owner_login: &str,
    cursor: Option<&str>,
) -> Result<AlertPage, AlertError> {
    let payload = json!({
        "query": ALERTS_QUERY,
        "variables": {
            "owner": owner_login,
            "name": repo_name,
            "count": ALERTS_PER_PAGE,
            "cursor": cursor,
        },
    });

    let response: GraphQlResponse = octocrab.graphql(&payload).await?;

    if let Some(errors) = response.errors {
        let message = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join(" | ");
        return Err(AlertError::QueryError {
            repo: repo_name.to_string(),
            message,
        });
    }

    let repository = response
        .data
        .and_then(|data| data.repository)
        .ok_or_else(|| AlertError::MissingData {
            repo: repo_name.to_string(),
        })?;

    Ok(AlertPage {
        description: repository.description,
        alerts: repository
            .vulnerability_alerts
            .nodes
            .into_iter()
            .map(VulnerabilityAlert::from)
            .collect(),
        page_info: repository.vulnerability_alerts.page_info,
    })
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<AlertData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AlertData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    description: Option<String>,
    vulnerability_alerts: AlertConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertConnection {
    page_info: PageInfo,
    nodes: Vec<AlertNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertNode {
    dismissed_at: Option<DateTime<Utc>>,
    dismiss_reason: Option<String>,
    security_vulnerability: SecurityVulnerability,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecurityVulnerability {
    severity: String,
    vulnerable_version_range: String,
    package: VulnerablePackage,
    advisory: Advisory,
}

#[derive(Debug, Deserialize)]
struct VulnerablePackage {
    ecosystem: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Advisory {
    summary: String,
    references: Vec<AdvisoryReference>,
}

#[derive(Debug, Deserialize)]
struct AdvisoryReference {
    url: String,
}

impl From<AlertNode> for VulnerabilityAlert {
    fn from(node: AlertNode) -> Self {
        let vulnerability = node.security_vulnerability;
        Self {
            dismissed_at: node.dismissed_at,
            dismiss_reason: node.dismiss_reason,
            package_ecosystem: vulnerability.package.ecosystem,
            package_name: vulnerability.package.name,
            vulnerable_version_range: vulnerability.vulnerable_version_range,
            severity: vulnerability.severity,
            advisory_summary: vulnerability.advisory.summary,
            advisory_references: vulnerability
                .advisory
                .references
                .into_iter()
                .map(|reference| reference.url)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert_node_json(dismissed: bool) -> serde_json::Value {
        json!({
            "dismissedAt": if dismissed { json!("2020-01-09T20:13:23Z") } else { serde_json::Value::Null },
            "dismissReason": if dismissed { json!("No bandwidth to fix this") } else { serde_json::Value::Null },
            "securityVulnerability": {
                "severity": "HIGH",
                "vulnerableVersionRange": "< 4.17.13",
                "package": {
                    "ecosystem": "NPM",
                    "name": "lodash"
                },
                "advisory": {
                    "summary": "Prototype pollution in lodash",
                    "references": [
                        { "url": "https://github.com/advisories/GHSA-p6mc-m468-83gw" },
                        { "url": "https://nvd.nist.gov/vuln/detail/CVE-2020-8203" }
                    ]
                }
            }
        })
    }

    #[test]
    fn maps_alert_nodes_into_flat_alerts() {
        let node: AlertNode = serde_json::from_value(alert_node_json(false)).unwrap();

        let alert = VulnerabilityAlert::from(node);

        assert!(alert.is_active());
        assert_eq!(alert.package_ecosystem, "NPM");
        assert_eq!(alert.package_name, "lodash");
        assert_eq!(alert.vulnerable_version_range, "< 4.17.13");
        assert_eq!(alert.severity, "HIGH");
        assert_eq!(alert.advisory_summary, "Prototype pollution in lodash");
        assert_eq!(alert.advisory_references.len(), 2);
        assert_eq!(
            alert.advisory_references[0],
            "https://github.com/advisories/GHSA-p6mc-m468-83gw"
        );
    }

    #[test]
    fn dismissed_nodes_are_not_active() {
        let node: AlertNode = serde_json::from_value(alert_node_json(true)).unwrap();

        let alert = VulnerabilityAlert::from(node);

        assert!(!alert.is_active());
        assert_eq!(
            alert.dismiss_reason.as_deref(),
            Some("No bandwidth to fix this")
        );
    }

    #[test]
    fn parses_page_info_from_connection() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": {
                "repository": {
                    "name": "widget",
                    "description": "A widget service",
                    "vulnerabilityAlerts": {
                        "pageInfo": {
                            "startCursor": "Y3Vyc29yOnYyOpHOAAAAAQ==",
                            "hasNextPage": true,
                            "endCursor": "Y3Vyc29yOnYyOpHOAAAACg=="
                        },
                        "nodes": [alert_node_json(false)]
                    }
                }
            }
        }))
        .unwrap();

        let repository = response.data.unwrap().repository.unwrap();
        assert_eq!(repository.description.as_deref(), Some("A widget service"));
        assert!(repository.vulnerability_alerts.page_info.has_next_page);
        assert_eq!(
            repository.vulnerability_alerts.page_info.end_cursor.as_deref(),
            Some("Y3Vyc29yOnYyOpHOAAAACg==")
        );
        assert_eq!(repository.vulnerability_alerts.nodes.len(), 1);
    }

    #[test]
    fn surfaces_graphql_errors() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [
                { "message": "Could not resolve to a Repository" }
            ]
        }))
        .unwrap();

        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Could not resolve to a Repository");
    }
}
