use reqwest::StatusCode;

use crate::config::ConfigError;
use crate::secure_storage::SecureStorageError;

/// Failure of a call made through [`crate::client::ApiClient`].
///
/// Response bodies are carried raw; interpreting backend-specific shapes
/// is left to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Not authenticated (401): {body}")]
    Unauthorized { body: String },

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Credential store error: {0}")]
    Credentials(#[from] SecureStorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Raw response body, when the server answered
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Unauthorized { body } => Some(body),
            _ => None,
        }
    }

    /// Peek at the `detail` or `error` string the backend puts in error bodies
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(self.body()?).ok()?;
        ["detail", "error"]
            .iter()
            .find_map(|field| value.get(field).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}
