//! Connection settings for one wiki.

use std::time::Duration;

use epi::Endpoint;
use thiserror::Error;
use url::Url;

/// Default request timeout applied by [`crate::ReqwestTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("epi/", env!("CARGO_PKG_VERSION"));

/// Problems detected while building a [`WikiConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL does not parse.
    #[error("Invalid wiki URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The base URL is not http or https.
    #[error("Unsupported URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },

    /// The script path is not empty and does not start with `/`.
    #[error("Invalid script path '{path}': must be empty or start with '/'")]
    InvalidScriptPath { path: String },
}

/// Where a wiki lives and how to talk to it.
///
/// Entry-point URLs are resolved once at construction, mirroring MediaWiki's
/// `wikiScript()`: `{base_url}{script_path}/index.php` and `.../api.php`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    index_url: Url,
    api_url: Url,
    user_agent: String,
    timeout: Duration,
}

impl WikiConfig {
    /// Creates a configuration for a wiki whose scripts sit directly under
    /// `base_url` (an empty `$wgScriptPath`).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_script_path(base_url, "")
    }

    /// Creates a configuration for a wiki whose scripts sit under
    /// `script_path` (e.g. `"/w"`).
    pub fn with_script_path(base_url: &str, script_path: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_owned(),
            message: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: base.scheme().to_owned(),
            });
        }
        if !script_path.is_empty() && !script_path.starts_with('/') {
            return Err(ConfigError::InvalidScriptPath {
                path: script_path.to_owned(),
            });
        }

        let root = format!(
            "{}{}",
            base.as_str().trim_end_matches('/'),
            script_path.trim_end_matches('/')
        );
        let resolve = |endpoint: Endpoint| {
            let url = format!("{root}/{}", endpoint.script_name());
            Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
                url,
                message: e.to_string(),
            })
        };

        Ok(Self {
            index_url: resolve(Endpoint::Index)?,
            api_url: resolve(Endpoint::Api)?,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the given entry point.
    pub fn script_url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Index => &self.index_url,
            Endpoint::Api => &self.api_url,
        }
    }

    pub fn user_agent_str(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}
