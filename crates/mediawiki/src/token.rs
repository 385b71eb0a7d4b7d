//! Edit token providers.
//!
//! Fetching a token requires a logged-in session, which is the host's
//! business. These providers only hand over a token the host already has.

use epi::{EditToken, TokenError, TokenProvider};

/// Environment variable read by [`EnvTokenProvider::default`].
pub const DEFAULT_TOKEN_VAR: &str = "EPI_EDIT_TOKEN";

/// Always returns the same token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: EditToken,
}

impl StaticTokenProvider {
    pub fn new(token: EditToken) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn edit_token(&self) -> Result<EditToken, TokenError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every call, so a token
/// refreshed by the host is picked up without rebuilding the provider.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

impl TokenProvider for EnvTokenProvider {
    fn edit_token(&self) -> Result<EditToken, TokenError> {
        let value = std::env::var(&self.var).map_err(|e| TokenError::Unavailable {
            reason: format!("{}: {e}", self.var),
        })?;
        EditToken::new(value).ok_or_else(|| TokenError::Unavailable {
            reason: format!("{} is empty", self.var),
        })
    }
}
