//! Persisted result of the most recent executed attempt.
//!
//! Exactly one [`AttemptOutcome`] is live at a time — every executed attempt
//! overwrites it, skipped ticks leave it untouched. The attempt policy reads
//! it to decide whether the next scheduler tick should run at all.

use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::atomic_write;
use crate::error::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// Capability interface over the outcome persistence.
pub trait OutcomeStore: Send + Sync {
    fn load(&self) -> Result<Option<AttemptOutcome>, BotError>;

    /// Overwrites the stored outcome with `(success, now)`.
    ///
    /// Timestamps are clamped to be non-decreasing across writes so a clock
    /// rollback cannot move the recorded attempt backwards in time.
    fn record(&self, success: bool, now: DateTime<Utc>) -> Result<AttemptOutcome, BotError>;
}

fn clamp_timestamp(
    previous: Option<&AttemptOutcome>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match previous {
        Some(prev) if prev.timestamp > now => prev.timestamp,
        _ => now,
    }
}

/// JSON-file adapter with atomic all-or-nothing writes.
pub struct FileOutcomeStore {
    path: PathBuf,
}

impl FileOutcomeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutcomeStore for FileOutcomeStore {
    fn load(&self) -> Result<Option<AttemptOutcome>, BotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn record(&self, success: bool, now: DateTime<Utc>) -> Result<AttemptOutcome, BotError> {
        let previous = self.load()?;
        let outcome = AttemptOutcome {
            success,
            timestamp: clamp_timestamp(previous.as_ref(), now),
        };
        let contents = serde_json::to_string_pretty(&outcome)?;
        atomic_write(&self.path, contents.as_bytes())?;
        Ok(outcome)
    }
}

/// In-memory test double for the outcome store.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryOutcomeStore {
    inner: Mutex<Option<AttemptOutcome>>,
}

#[cfg(test)]
impl MemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: AttemptOutcome) -> Self {
        Self {
            inner: Mutex::new(Some(outcome)),
        }
    }
}

#[cfg(test)]
impl OutcomeStore for MemoryOutcomeStore {
    fn load(&self) -> Result<Option<AttemptOutcome>, BotError> {
        Ok(*self.inner.lock().expect("outcome store lock poisoned"))
    }

    fn record(&self, success: bool, now: DateTime<Utc>) -> Result<AttemptOutcome, BotError> {
        let mut guard = self.inner.lock().expect("outcome store lock poisoned");
        let outcome = AttemptOutcome {
            success,
            timestamp: clamp_timestamp(guard.as_ref(), now),
        };
        *guard = Some(outcome);
        Ok(outcome)
    }
}
