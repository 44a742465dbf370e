//! Credential storage behind a capability interface.
//!
//! The production adapter keeps the username and password as two entries in
//! the platform secure store via the `keyring` crate (macOS Keychain, Windows
//! Credential Manager, Secret Service on Linux). Tests use the in-memory
//! double instead of touching real platform storage.

#[cfg(test)]
use std::sync::Mutex;

use thiserror::Error;

/// Service name for all loginbot entries in the platform credential store.
const SERVICE_NAME: &str = "com.loginbot.credentials";

const USERNAME_ACCOUNT: &str = "username";
const PASSWORD_ACCOUNT: &str = "password";

/// A username/password pair for one login attempt.
///
/// Exists only transiently in memory while an attempt runs. Never persisted
/// by the workflow itself and never logged — `Debug` redacts the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    /// No credentials stored under the expected accounts.
    #[error("credentials not found")]
    NotFound,

    /// The underlying secure store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Capability interface over the external secure store.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Credentials, CredentialError>;
    fn put(&self, credentials: &Credentials) -> Result<(), CredentialError>;
    /// Removes stored credentials. Idempotent: deleting missing entries is Ok.
    fn delete(&self) -> Result<(), CredentialError>;
}

/// Production adapter over the platform secure store.
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_owned(),
        }
    }

    /// Use a non-default service name (integration tests, side installs).
    #[allow(dead_code)]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, account: &str) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(&self.service, account)
            .map_err(|e| CredentialError::Storage(format!("failed to create keyring entry: {e}")))
    }

    fn get_account(&self, account: &str) -> Result<String, CredentialError> {
        match self.entry(account)?.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound),
            Err(e) => Err(CredentialError::Storage(format!(
                "failed to retrieve credential: {e}"
            ))),
        }
    }

    fn delete_account(&self, account: &str) -> Result<(), CredentialError> {
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError::Storage(format!(
                "failed to delete credential: {e}"
            ))),
        }
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Credentials, CredentialError> {
        let username = self.get_account(USERNAME_ACCOUNT)?;
        let password = self.get_account(PASSWORD_ACCOUNT)?;
        Ok(Credentials { username, password })
    }

    fn put(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        self.entry(USERNAME_ACCOUNT)?
            .set_password(&credentials.username)
            .map_err(|e| CredentialError::Storage(format!("failed to store username: {e}")))?;
        self.entry(PASSWORD_ACCOUNT)?
            .set_password(&credentials.password)
            .map_err(|e| CredentialError::Storage(format!("failed to store password: {e}")))?;
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        self.delete_account(USERNAME_ACCOUNT)?;
        self.delete_account(PASSWORD_ACCOUNT)
    }
}

/// In-memory test double for the credential store.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credentials>>,
}

#[cfg(test)]
impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(username: &str, password: &str) -> Self {
        Self {
            inner: Mutex::new(Some(Credentials {
                username: username.to_owned(),
                password: password.to_owned(),
            })),
        }
    }
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Credentials, CredentialError> {
        self.inner
            .lock()
            .map_err(|e| CredentialError::Storage(e.to_string()))?
            .clone()
            .ok_or(CredentialError::NotFound)
    }

    fn put(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        *self
            .inner
            .lock()
            .map_err(|e| CredentialError::Storage(e.to_string()))? = Some(credentials.clone());
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        *self
            .inner
            .lock()
            .map_err(|e| CredentialError::Storage(e.to_string()))? = None;
        Ok(())
    }
}
