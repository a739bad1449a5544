//! Code-owner resolution from CODEOWNERS files.
//!
//! Probes a fixed set of candidate paths in each repository, decodes the
//! file content returned by the contents API, and extracts owner handles.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use octocrab::Octocrab;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Candidate CODEOWNERS locations, probed in order.
const CODE_OWNER_FILES: [&str; 3] = ["CODEOWNERS", "docs/CODEOWNERS", ".github/CODEOWNERS"];

/// Matches a `*` rule followed by one owner handle.
static OWNER_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\s+(\S+)").expect("valid regex"));

/// Errors that can occur during code-owner resolution.
#[derive(Debug, Error)]
pub enum CodeOwnersError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// CODEOWNERS content could not be decoded.
    #[error("Failed to decode CODEOWNERS from repo '{repo}': {message}")]
    DecodeError { repo: String, message: String },
}

/// Resolves the possible code owners for a repository.
///
/// Each candidate path that exists contributes one entry per matched rule,
/// formatted as `"<owner> (from /<path>)"`, in the order matches appear in
/// the file and across files in candidate-path order. A repository may
/// contribute owners from multiple CODEOWNERS locations; none are
/// deduplicated.
///
/// # Errors
///
/// A "not found" response for a candidate path is not an error and moves
/// resolution on to the next path. Any other fetch error, and any decode
/// failure, aborts resolution for this repository and propagates.
pub async fn resolve_code_owners(
    octocrab: &Octocrab,
    repo_name: &str,
    owner_login: &str,
) -> Result<Vec<String>, CodeOwnersError> {
    let mut code_owners = Vec::new();

    for path in CODE_OWNER_FILES {
        let contents = match octocrab
            .repos(owner_login, repo_name)
            .get_content()
            .path(path)
            .send()
            .await
        {
            Ok(contents) => contents,
            Err(error) if is_not_found(&error) => {
                // No code owners file at this location.
                debug!(repo = %repo_name, path = %path, "No CODEOWNERS at this path");
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        let Some(encoded) = contents
            .items
            .into_iter()
            .next()
            .and_then(|item| item.content)
        else {
            continue;
        };

        let decoded =
            decode_content(&encoded).map_err(|message| CodeOwnersError::DecodeError {
                repo: repo_name.to_string(),
                message,
            })?;

        code_owners.extend(extract_code_owners(&decoded, path));
    }

    Ok(code_owners)
}

/// Checks whether an API error is a plain 404.
fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

/// Decodes base64 file content as returned by the contents API.
///
/// The API wraps the payload across multiple lines, so whitespace is
/// stripped before decoding.
fn decode_content(encoded: &str) -> Result<String, String> {
    let compact: String = encoded.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Extracts owner handles from decoded CODEOWNERS content.
///
/// A file can declare more than one owner, one rule per match.
fn extract_code_owners(content: &str, path: &str) -> Vec<String> {
    OWNER_RULE
        .captures_iter(content)
        .map(|captures| format!("{} (from /{})", &captures[1], path))
        .collect()
}
