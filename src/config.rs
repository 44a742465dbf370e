//! Bot configuration persisted as `config.toml` in the state directory.
//!
//! [`BotConfig`] holds the target login URL plus the probe and verification
//! endpoints. Values missing from the file use sensible defaults. The
//! workflow consumes configuration through the [`ConfigSource`] capability
//! so tests can substitute an in-memory source.

use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::BotError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Absolute URL of the login endpoint. Required for an attempt to run.
    #[serde(default)]
    pub target_url: String,

    /// Path substituted into the target URL for session verification.
    #[serde(default = "default_verify_path")]
    pub verify_path: String,

    /// Known-stable host probed for connectivity before each attempt.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
}

fn default_verify_path() -> String {
    "/api/user".to_string()
}

fn default_probe_url() -> String {
    "https://www.google.com".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            verify_path: default_verify_path(),
            probe_url: default_probe_url(),
        }
    }
}

impl BotConfig {
    /// Validates and parses the configured login URL.
    ///
    /// An empty or relative URL, or one with a non-http(s) scheme, is a
    /// terminal condition for an attempt.
    pub fn target_url(&self) -> Result<Url, BotError> {
        parse_target_url(&self.target_url)
    }
}

/// Parses `raw` as an absolute http(s) URL.
pub fn parse_target_url(raw: &str) -> Result<Url, BotError> {
    if raw.trim().is_empty() {
        return Err(BotError::Config("target URL is not set".into()));
    }
    let url = Url::parse(raw).map_err(|e| BotError::Config(format!("invalid target URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BotError::Config(format!(
            "unsupported URL scheme: {other}"
        ))),
    }
}

/// Capability interface over externally persisted configuration.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<BotConfig, BotError>;
}

/// TOML-file adapter. Missing files load as defaults (the attempt then fails
/// with `ConfigInvalid` at URL validation rather than at file IO).
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persists `config`, creating parent directories as needed.
    pub fn save(&self, config: &BotConfig) -> Result<(), BotError> {
        let contents = toml::to_string_pretty(config)?;
        atomic_write(&self.path, contents.as_bytes())
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<BotConfig, BotError> {
        if self.path.exists() {
            let contents = std::fs::read_to_string(&self.path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(BotConfig::default())
        }
    }
}

/// In-memory test double for the config source.
#[cfg(test)]
pub struct MemoryConfigSource {
    config: BotConfig,
}

#[cfg(test)]
impl MemoryConfigSource {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    pub fn with_target_url(url: &str) -> Self {
        Self {
            config: BotConfig {
                target_url: url.to_owned(),
                ..BotConfig::default()
            },
        }
    }
}

#[cfg(test)]
impl ConfigSource for MemoryConfigSource {
    fn load(&self) -> Result<BotConfig, BotError> {
        Ok(self.config.clone())
    }
}

/// All-or-nothing file write: stage into a sibling temp file, then rename
/// over the destination so a crash mid-write cannot corrupt prior state.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), BotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = std::fs::File::create(&tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp, path)?;
    Ok(())
}
