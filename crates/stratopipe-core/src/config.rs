use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_LOGIN_PAGE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid location {url:?}: {source}")]
    InvalidLocation {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Scheme prefixed to a stored token that does not carry its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
}

impl AuthScheme {
    fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Token => "Token",
        }
    }

    /// Build the `Authorization` header value for a stored token.
    ///
    /// A stored value containing whitespace already names its scheme
    /// (`"Token abc"`) and is forwarded verbatim.
    pub fn header_value(&self, token: &str) -> String {
        if token.contains(char::is_whitespace) {
            token.to_string()
        } else {
            format!("{} {}", self.prefix(), token)
        }
    }
}

/// Client configuration, built in code or loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Injected base URL; wins over the environment and the default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Login page resolved against `location` when a request comes back 401
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_page: Option<String>,

    /// Current location of the caller (defaults to the base URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Issue a priming GET when an unsafe request has no CSRF cookie yet
    #[serde(default = "default_prime_csrf")]
    pub prime_csrf: bool,
}

fn default_prime_csrf() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_scheme: AuthScheme::default(),
            login_page: None,
            location: None,
            prime_csrf: default_prime_csrf(),
        }
    }
}

impl ClientConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ClientConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolve the base URL once: injected value, then environment, then default
    pub fn resolve_base_url(&self) -> Result<Url, ConfigError> {
        let env = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(self.base_url.as_deref(), env.as_deref())
    }

    /// Login page resolved relative to the configured location
    pub fn login_url(&self, base_url: &Url) -> Result<Url, ConfigError> {
        let location = match self.location.as_deref() {
            Some(raw) => Url::parse(raw).map_err(|source| ConfigError::InvalidLocation {
                url: raw.to_string(),
                source,
            })?,
            None => base_url.clone(),
        };
        let page = self.login_page.as_deref().unwrap_or(DEFAULT_LOGIN_PAGE);
        location
            .join(page)
            .map_err(|source| ConfigError::InvalidLocation {
                url: page.to_string(),
                source,
            })
    }
}

pub fn resolve_base_url(injected: Option<&str>, env: Option<&str>) -> Result<Url, ConfigError> {
    let present = |value: &&str| !value.trim().is_empty();
    let raw = injected
        .filter(present)
        .or_else(|| env.filter(present))
        .unwrap_or(DEFAULT_BASE_URL);

    let normalized = normalize_trailing_slash(raw.trim());
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
        url: normalized,
        source,
    })
}

/// Collapse any run of trailing slashes into exactly one
pub fn normalize_trailing_slash(raw: &str) -> String {
    format!("{}/", raw.trim_end_matches('/'))
}
