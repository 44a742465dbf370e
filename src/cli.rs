//! Command-line interface, built on clap.
//!
//! `run` is what the external scheduler invokes; the remaining subcommands
//! cover configuration and credential management.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// loginbot — scheduled website login keeper.
#[derive(Debug, Parser)]
#[command(name = "loginbot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the config file, outcome state, and logs.
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one login attempt (intended to be triggered by a scheduler).
    Run {
        /// Force the attempt, bypassing the cool-down skip check.
        #[arg(long)]
        test: bool,
    },

    /// Show the last attempt outcome and the configured target URL.
    Status,

    /// Validate and persist the login endpoint URL.
    SetUrl {
        /// Absolute http(s) URL of the login endpoint.
        url: String,
    },

    /// Store login credentials in the platform secure store.
    SetCredentials {
        username: String,
        password: String,
    },

    /// Remove stored credentials from the platform secure store.
    ClearCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::parse_from(["loginbot", "run"]);
        match cli.command {
            Command::Run { test } => assert!(!test),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_run_with_test_flag() {
        let cli = Cli::parse_from(["loginbot", "run", "--test"]);
        match cli.command {
            Command::Run { test } => assert!(test),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["loginbot", "--state-dir", "/tmp/bot", "--verbose", "status"]);
        assert!(cli.verbose);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/bot")));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn cli_parses_set_url() {
        let cli = Cli::parse_from(["loginbot", "set-url", "https://example.com/login"]);
        match cli.command {
            Command::SetUrl { url } => assert_eq!(url, "https://example.com/login"),
            _ => panic!("expected SetUrl command"),
        }
    }

    #[test]
    fn cli_parses_set_credentials() {
        let cli = Cli::parse_from(["loginbot", "set-credentials", "userA", "passA"]);
        match cli.command {
            Command::SetCredentials { username, password } => {
                assert_eq!(username, "userA");
                assert_eq!(password, "passA");
            }
            _ => panic!("expected SetCredentials command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
