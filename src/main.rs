mod cli;
mod config;
mod credentials;
mod error;
mod logging;
mod net;
mod outcome;
mod policy;
mod ui;
mod workflow;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use config::{ConfigSource, FileConfigSource, parse_target_url};
use credentials::{CredentialStore, Credentials, KeyringCredentialStore};
use net::{AuthClient, HttpProbe};
use outcome::{FileOutcomeStore, OutcomeStore};
use ui::Reporter;
use workflow::{AttemptReport, LoginWorkflow};

fn resolve_state_dir(cli: &Cli) -> PathBuf {
    cli.state_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loginbot")
    })
}

fn config_source(state_dir: &Path) -> FileConfigSource {
    FileConfigSource::new(state_dir.join("config.toml"))
}

/// Probe target for the connectivity check, read ahead of the workflow.
///
/// An unreadable config file must not abort here: the workflow re-reads the
/// file during its FetchingConfig step, classifies the failure, and records
/// an outcome. Fall back to the default probe host instead of erroring.
fn probe_url(source: &FileConfigSource) -> String {
    source.load().unwrap_or_default().probe_url
}

async fn run_attempt(state_dir: &Path, forced: bool) -> Result<AttemptReport> {
    let config_source = config_source(state_dir);
    let outcome_store = FileOutcomeStore::new(state_dir.join("outcome.json"));
    let credential_store = KeyringCredentialStore::new();

    let probe = HttpProbe::new(probe_url(&config_source));
    let auth = AuthClient::new();

    let workflow = LoginWorkflow::new(
        &probe,
        &auth,
        &credential_store,
        &config_source,
        &outcome_store,
    );
    Ok(workflow.attempt(forced).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let state_dir = resolve_state_dir(&cli);
    let guard = logging::init(Some(&state_dir.join("logs")), cli.verbose);

    let reporter = Reporter::new();
    let exit_code = match cli.command {
        Command::Run { test } => {
            let report = run_attempt(&state_dir, test).await?;
            reporter.print_report(&report);
            if test {
                reporter.print_details(&report);
            }
            report.exit_code()
        }

        Command::Status => {
            let config = config_source(&state_dir).load()?;
            let outcome = FileOutcomeStore::new(state_dir.join("outcome.json")).load()?;
            reporter.print_status(&config, outcome.as_ref());
            0
        }

        Command::SetUrl { url } => {
            parse_target_url(&url)?;
            let source = config_source(&state_dir);
            let mut config = source.load()?;
            config.target_url = url;
            source.save(&config)?;
            println!("Target URL saved.");
            0
        }

        Command::SetCredentials { username, password } => {
            KeyringCredentialStore::new().put(&Credentials { username, password })?;
            println!("Credentials stored in the platform secure store.");
            0
        }

        Command::ClearCredentials => {
            KeyringCredentialStore::new().delete()?;
            println!("Credentials removed.");
            0
        }
    };

    // Flush the file appender before exiting.
    drop(guard);
    std::process::exit(exit_code);
}
