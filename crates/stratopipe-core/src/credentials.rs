//! Session credential sources
//!
//! The HTTP client never reads a credential store directly. It asks a
//! [`CredentialProvider`] for the bearer token and the CSRF token on every
//! request, which keeps the stores swappable and mockable.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::constants::CSRF_COOKIE;
use crate::secure_storage::{SecureKey, SecureStorage, SecureStorageError};

pub trait CredentialProvider: Send + Sync {
    /// Bearer token of the current session, if any
    fn token(&self) -> Result<Option<String>, SecureStorageError>;

    /// Anti-forgery token issued by the server, if any
    fn csrf_token(&self) -> Result<Option<String>, SecureStorageError>;

    fn store_token(&self, token: &str) -> Result<(), SecureStorageError>;

    fn clear_token(&self) -> Result<(), SecureStorageError>;

    /// Cookie jar the HTTP client should share, so server-set cookies
    /// become visible to [`CredentialProvider::csrf_token`]
    fn cookie_jar(&self) -> Option<Arc<Jar>> {
        None
    }

    /// Save cookie state so a later process resumes the same session
    fn persist_session(&self) -> Result<(), SecureStorageError> {
        Ok(())
    }
}

/// Credentials held in process memory only
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
    csrf_token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write() = Some(token.into());
        self
    }

    pub fn with_csrf_token(self, csrf_token: impl Into<String>) -> Self {
        *self.csrf_token.write() = Some(csrf_token.into());
        self
    }

    pub fn set_csrf_token(&self, csrf_token: Option<String>) {
        *self.csrf_token.write() = csrf_token;
    }
}

impl CredentialProvider for MemoryCredentials {
    fn token(&self) -> Result<Option<String>, SecureStorageError> {
        Ok(self.token.read().clone())
    }

    fn csrf_token(&self) -> Result<Option<String>, SecureStorageError> {
        Ok(self.csrf_token.read().clone())
    }

    fn store_token(&self, token: &str) -> Result<(), SecureStorageError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SecureStorageError> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Token persisted in the OS keyring, CSRF token read from a cookie jar
/// shared with the HTTP client.
///
/// Session-auth servers keep the login in a cookie, so the jar can be
/// backed by a session file that survives the process.
pub struct SessionCredentials {
    jar: Arc<Jar>,
    cookie_url: Url,
    session_path: Option<PathBuf>,
}

/// Cookies saved for one base URL
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSession {
    base_url: String,
    cookies: Vec<String>,
}

impl SessionCredentials {
    /// `cookie_url` is the URL whose cookies are consulted, normally the
    /// API base URL
    pub fn new(cookie_url: Url) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            cookie_url,
            session_path: None,
        }
    }

    /// Like [`SessionCredentials::new`], restoring cookies from
    /// `session_path` and saving them there on [`CredentialProvider::persist_session`].
    /// A session saved for a different base URL is ignored.
    pub fn persistent(
        cookie_url: Url,
        session_path: impl Into<PathBuf>,
    ) -> Result<Self, SecureStorageError> {
        let session_path = session_path.into();
        let jar = Arc::new(Jar::default());

        match read_session(&session_path)? {
            Some(saved) if saved.base_url == cookie_url.as_str() => {
                for cookie in &saved.cookies {
                    jar.add_cookie_str(&format!("{}; Path=/", cookie), &cookie_url);
                }
                debug!(path = %session_path.display(), count = saved.cookies.len(), "session cookies restored");
            }
            Some(saved) => {
                debug!(saved_for = %saved.base_url, "session file belongs to another server");
            }
            None => {}
        }

        Ok(Self {
            jar,
            cookie_url,
            session_path: Some(session_path),
        })
    }

    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    pub fn session_path(&self) -> Option<&Path> {
        self.session_path.as_deref()
    }

    /// `name=value` pairs the jar would send to the base URL
    fn cookie_pairs(&self) -> Vec<String> {
        self.jar
            .cookies(&self.cookie_url)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| {
                header
                    .split(';')
                    .map(str::trim)
                    .filter(|pair| !pair.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Delete the session file. The keyring token is left alone.
    pub fn forget_session(&self) -> Result<(), SecureStorageError> {
        let Some(path) = &self.session_path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SecureStorageError::SessionFile {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl CredentialProvider for SessionCredentials {
    fn token(&self) -> Result<Option<String>, SecureStorageError> {
        SecureStorage::get_optional(SecureKey::AuthToken)
    }

    fn csrf_token(&self) -> Result<Option<String>, SecureStorageError> {
        let header = match self.jar.cookies(&self.cookie_url) {
            Some(header) => header,
            None => return Ok(None),
        };
        Ok(header
            .to_str()
            .ok()
            .and_then(|cookies| cookie_value(cookies, CSRF_COOKIE)))
    }

    fn store_token(&self, token: &str) -> Result<(), SecureStorageError> {
        SecureStorage::set(SecureKey::AuthToken, token)
    }

    fn clear_token(&self) -> Result<(), SecureStorageError> {
        self.forget_session()?;
        SecureStorage::delete(SecureKey::AuthToken)
    }

    fn cookie_jar(&self) -> Option<Arc<Jar>> {
        Some(self.jar.clone())
    }

    fn persist_session(&self) -> Result<(), SecureStorageError> {
        let Some(path) = &self.session_path else {
            return Ok(());
        };
        let saved = SavedSession {
            base_url: self.cookie_url.to_string(),
            cookies: self.cookie_pairs(),
        };
        write_session(path, &saved)?;
        debug!(path = %path.display(), count = saved.cookies.len(), "session cookies saved");
        Ok(())
    }
}

fn read_session(path: &Path) -> Result<Option<SavedSession>, SecureStorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SecureStorageError::SessionFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str(&content) {
        Ok(saved) => Ok(Some(saved)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
            Ok(None)
        }
    }
}

fn write_session(path: &Path, saved: &SavedSession) -> Result<(), SecureStorageError> {
    let io_error = |source: std::io::Error| SecureStorageError::SessionFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let bytes = serde_json::to_vec_pretty(saved).map_err(|source| {
        SecureStorageError::SessionEncode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(io_error)?;
    file.write_all(&bytes).map_err(io_error)
}

/// Value of the cookie `name` in a `Cookie` header string
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
