//! The login attempt workflow.
//!
//! One [`LoginWorkflow`] serves both the scheduled headless run and the
//! interactive "test now" trigger through a single `attempt(forced)`
//! operation. Each attempt walks
//!
//! ```text
//! Idle → CheckingNetwork → FetchingCredentials → FetchingConfig
//!      → Authenticating → VerifyingSession → Done
//! ```
//!
//! strictly sequentially. Every executed attempt writes exactly one outcome,
//! success or failure; a policy skip writes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ConfigSource;
use crate::credentials::CredentialStore;
use crate::error::{BotError, FailureReason};
use crate::net::{Authenticator, ConnectivityProbe, LoginResult};
use crate::outcome::OutcomeStore;
use crate::policy::AttemptPolicy;

/// States of the login attempt state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Idle,
    CheckingNetwork,
    FetchingCredentials,
    FetchingConfig,
    Authenticating,
    VerifyingSession,
    Done,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "IDLE"),
            State::CheckingNetwork => write!(f, "CHECKING_NETWORK"),
            State::FetchingCredentials => write!(f, "FETCHING_CREDENTIALS"),
            State::FetchingConfig => write!(f, "FETCHING_CONFIG"),
            State::Authenticating => write!(f, "AUTHENTICATING"),
            State::VerifyingSession => write!(f, "VERIFYING_SESSION"),
            State::Done => write!(f, "DONE"),
        }
    }
}

/// How one scheduler tick resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// The attempt policy declined to run; no outcome was written.
    Skipped,
    Success,
    Failure(FailureReason),
}

/// Record of one tick: disposition, visited states, and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    pub disposition: Disposition,
    pub states: Vec<State>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl AttemptReport {
    fn finish(disposition: Disposition, states: Vec<State>, started_at: DateTime<Utc>) -> Self {
        let completed_at = Utc::now();
        Self {
            disposition,
            states,
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
        }
    }

    /// Process exit code: 0 on success or skip, 1 on any failure outcome.
    pub fn exit_code(&self) -> i32 {
        match self.disposition {
            Disposition::Skipped | Disposition::Success => 0,
            Disposition::Failure(_) => 1,
        }
    }
}

/// Sequences one full login attempt against injected capabilities.
pub struct LoginWorkflow<'a, P, A> {
    probe: &'a P,
    auth: &'a A,
    credentials: &'a dyn CredentialStore,
    config: &'a dyn ConfigSource,
    outcomes: &'a dyn OutcomeStore,
    policy: AttemptPolicy,
}

impl<'a, P: ConnectivityProbe, A: Authenticator> LoginWorkflow<'a, P, A> {
    pub fn new(
        probe: &'a P,
        auth: &'a A,
        credentials: &'a dyn CredentialStore,
        config: &'a dyn ConfigSource,
        outcomes: &'a dyn OutcomeStore,
    ) -> Self {
        Self {
            probe,
            auth,
            credentials,
            config,
            outcomes,
            policy: AttemptPolicy::default(),
        }
    }

    /// Runs one scheduler tick to completion.
    ///
    /// Consults the attempt policy first; a skip returns without touching
    /// the outcome store. Otherwise the workflow executes and the terminal
    /// state is persisted, whatever it is. Only infrastructure failures of
    /// the outcome store itself surface as `Err`.
    pub async fn attempt(&self, forced: bool) -> Result<AttemptReport, BotError> {
        let started_at = Utc::now();

        let prior = self.outcomes.load()?;
        if !self.policy.should_attempt(prior.as_ref(), started_at, forced) {
            info!("skipping attempt: last successful login is still fresh");
            return Ok(AttemptReport::finish(
                Disposition::Skipped,
                Vec::new(),
                started_at,
            ));
        }

        let mut states = vec![State::Idle];
        let disposition = match self.execute(&mut states).await {
            Ok(()) => {
                info!("login attempt succeeded");
                self.outcomes.record(true, Utc::now())?;
                Disposition::Success
            }
            Err(reason) => {
                warn!("login attempt failed: {reason}");
                self.outcomes.record(false, Utc::now())?;
                Disposition::Failure(reason)
            }
        };
        states.push(State::Done);

        Ok(AttemptReport::finish(disposition, states, started_at))
    }

    async fn execute(&self, states: &mut Vec<State>) -> Result<(), FailureReason> {
        states.push(State::CheckingNetwork);
        if !self.probe.is_reachable().await {
            return Err(FailureReason::NoConnectivity);
        }
        info!("network connectivity verified");

        states.push(State::FetchingCredentials);
        let credentials = self.credentials.get().map_err(|e| {
            warn!("failed to retrieve credentials: {e}");
            FailureReason::CredentialUnavailable
        })?;
        info!("credentials retrieved");

        states.push(State::FetchingConfig);
        let config = self.config.load().map_err(|e| {
            warn!("failed to load configuration: {e}");
            FailureReason::ConfigInvalid
        })?;
        let url = config.target_url().map_err(|e| {
            warn!("{e}");
            FailureReason::ConfigInvalid
        })?;

        states.push(State::Authenticating);
        info!("attempting login to {url}");
        match self.auth.login(&url, &credentials).await {
            LoginResult::Authenticated => {}
            LoginResult::Rejected => return Err(FailureReason::AuthRejected),
            LoginResult::Transport => return Err(FailureReason::TransportError),
            LoginResult::Encoding => return Err(FailureReason::EncodingError),
        }

        states.push(State::VerifyingSession);
        if !self.auth.verify_session(&url, &config.verify_path).await {
            return Err(FailureReason::SessionInvalid);
        }
        info!("session verified");

        Ok(())
    }
}
