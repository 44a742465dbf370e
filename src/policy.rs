//! Skip/cool-down decision for each scheduler tick.
//!
//! The external scheduler fires at a fixed interval, but a recent successful
//! session is presumed still valid: consecutive successes are not
//! re-validated more often than once per ~55 minutes. The window sits just
//! under an hour to tolerate clock and scheduler jitter. Failures never
//! cool down — the next tick always retries.

use chrono::{DateTime, Duration, Utc};

use crate::outcome::AttemptOutcome;

/// Decides whether a scheduler tick should execute the login workflow.
#[derive(Debug, Clone)]
pub struct AttemptPolicy {
    cooldown: Duration,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::minutes(55),
        }
    }
}

impl AttemptPolicy {
    /// Policy with a non-default cool-down window.
    #[allow(dead_code)]
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Returns true when this tick should run the workflow.
    ///
    /// - `forced` (manual/test trigger) always runs.
    /// - No prior outcome always runs.
    /// - A prior success younger than the cool-down window skips.
    /// - A prior failure, or a success aged past the window, runs.
    ///
    /// A stored timestamp ahead of `now` (clock rollback) counts as
    /// zero elapsed time, so a recent success still skips.
    pub fn should_attempt(
        &self,
        outcome: Option<&AttemptOutcome>,
        now: DateTime<Utc>,
        forced: bool,
    ) -> bool {
        if forced {
            return true;
        }
        let Some(outcome) = outcome else {
            return true;
        };
        if !outcome.success {
            return true;
        }
        let elapsed = (now - outcome.timestamp).max(Duration::zero());
        elapsed >= self.cooldown
    }
}
