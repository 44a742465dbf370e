use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Credential store error: {0}")]
    Credential(#[from] CredentialError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Why an executed attempt ended in `Done(failure)`.
///
/// Every reason is terminal for the current run — nothing is retried
/// internally. The next scheduler tick, gated by the attempt policy, is the
/// only retry mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The connectivity probe reported the network as unreachable.
    NoConnectivity,
    /// Credentials missing from the store, or the store itself failed.
    CredentialUnavailable,
    /// Target URL missing, empty, or not an absolute http(s) URL.
    ConfigInvalid,
    /// Transport-level login failure (timeout, DNS, connection reset).
    TransportError,
    /// The server rejected the login (non-2xx, success=false, or error field).
    AuthRejected,
    /// Login succeeded but the session verification request did not confirm it.
    SessionInvalid,
    /// The login request body could not be serialized.
    EncodingError,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NoConnectivity => write!(f, "no network connectivity"),
            FailureReason::CredentialUnavailable => write!(f, "credentials unavailable"),
            FailureReason::ConfigInvalid => write!(f, "invalid or missing target URL"),
            FailureReason::TransportError => write!(f, "login transport error"),
            FailureReason::AuthRejected => write!(f, "login rejected"),
            FailureReason::SessionInvalid => write!(f, "session verification failed"),
            FailureReason::EncodingError => write!(f, "failed to encode login request"),
        }
    }
}
