//! Hammer configuration.

/// Configuration shared by every hammer operation.
///
/// Constructed once from parsed CLI input and environment lookups, then
/// threaded as a parameter into each operation.
#[derive(Debug, Clone)]
pub struct HammerConfig {
    /// Organization whose repositories are operated on.
    organization: String,
    /// GitHub token used for API calls.
    token: String,
}

impl HammerConfig {
    /// Creates a new configuration.
    pub fn new(organization: String, token: String) -> Self {
        Self {
            organization,
            token,
        }
    }

    /// Returns the organization to operate on.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }
}
