//! GitHub client construction.

use crate::config::HammerConfig;
use octocrab::Octocrab;

/// Builds an authenticated GitHub client.
///
/// The same client serves both API surfaces: the paginated REST resource
/// API and the GraphQL query API used for vulnerability alerts.
///
/// # Errors
///
/// Returns [`octocrab::Error`] if the client cannot be constructed.
pub fn build_client(config: &HammerConfig) -> Result<Octocrab, octocrab::Error> {
    Octocrab::builder()
        .personal_token(config.token().to_string())
        .build()
}
