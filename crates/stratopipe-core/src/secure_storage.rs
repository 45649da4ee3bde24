/// Secure storage for the session token and cached user profile
///
/// Uses OS-backed secure storage:
/// - macOS/iOS: Keychain
/// - Linux: kernel keyutils
/// - Windows: Credential Manager
///
/// Writes are read back through a fresh entry, so a backend that drops
/// values (keyring's mock store on an unsupported platform) fails the write.
use keyring::Entry;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{AUTH_TOKEN_KEY, CURRENT_USER_KEY};

const SERVICE_NAME: &str = "com.stratopipe.client";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecureKey {
    AuthToken,
    CurrentUser,
}

impl SecureKey {
    fn key_name(&self) -> &'static str {
        match self {
            SecureKey::AuthToken => AUTH_TOKEN_KEY,
            SecureKey::CurrentUser => CURRENT_USER_KEY,
        }
    }
}

impl fmt::Display for SecureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecureStorageError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Key not found: {0}")]
    KeyNotFound(SecureKey),

    #[error("Keyring accepted {0} but did not keep it; no persistent keyring backend is available")]
    NotPersisted(SecureKey),

    #[error("Session file {path}: {source}")]
    SessionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode session file {path}: {source}")]
    SessionEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct SecureStorage;

impl SecureStorage {
    pub fn set(key: SecureKey, value: &str) -> Result<(), SecureStorageError> {
        write_verified(|| Entry::new(SERVICE_NAME, key.key_name()), key, value)
    }

    pub fn get(key: SecureKey) -> Result<String, SecureStorageError> {
        let entry = Entry::new(SERVICE_NAME, key.key_name())?;
        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => Err(SecureStorageError::KeyNotFound(key)),
            Err(e) => Err(SecureStorageError::Keyring(e)),
        }
    }

    /// Like [`SecureStorage::get`], but a missing entry is `Ok(None)`
    pub fn get_optional(key: SecureKey) -> Result<Option<String>, SecureStorageError> {
        match Self::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(SecureStorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn delete(key: SecureKey) -> Result<(), SecureStorageError> {
        let entry = Entry::new(SERVICE_NAME, key.key_name())?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted is success
            Err(e) => Err(SecureStorageError::Keyring(e)),
        }
    }

    pub fn exists(key: SecureKey) -> bool {
        Self::get(key).is_ok()
    }
}

fn write_verified(
    open: impl Fn() -> keyring::Result<Entry>,
    key: SecureKey,
    value: &str,
) -> Result<(), SecureStorageError> {
    open()?.set_password(value)?;
    match open()?.get_password() {
        Ok(stored) if stored == value => Ok(()),
        Ok(_) | Err(keyring::Error::NoEntry) => Err(SecureStorageError::NotPersisted(key)),
        Err(e) => Err(SecureStorageError::Keyring(e)),
    }
}
