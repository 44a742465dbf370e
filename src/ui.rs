//! Terminal output for interactive use — colored result lines via `console`.

use console::Style;

use crate::config::BotConfig;
use crate::outcome::AttemptOutcome;
use crate::workflow::{AttemptReport, Disposition};

pub struct Reporter {
    green: Style,
    red: Style,
    yellow: Style,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// One-line result of a tick.
    pub fn print_report(&self, report: &AttemptReport) {
        match report.disposition {
            Disposition::Success => {
                println!(
                    "  {} Login completed successfully",
                    self.green.apply_to("✓")
                );
            }
            Disposition::Skipped => {
                println!(
                    "  {} Skipped: last successful login is still fresh",
                    self.yellow.apply_to("↷")
                );
            }
            Disposition::Failure(reason) => {
                println!("  {} Login failed: {reason}", self.red.apply_to("✗"));
            }
        }
    }

    /// Full attempt report as pretty JSON, for `run --test`.
    pub fn print_details(&self, report: &AttemptReport) {
        println!();
        println!("{}", self.yellow.apply_to("─── Attempt Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }

    /// Current configuration and last persisted outcome.
    pub fn print_status(&self, config: &BotConfig, outcome: Option<&AttemptOutcome>) {
        let url = if config.target_url.is_empty() {
            "(not set)"
        } else {
            config.target_url.as_str()
        };
        println!("Target URL:   {url}");
        println!("Verify path:  {}", config.verify_path);

        match outcome {
            None => println!("Last attempt: never"),
            Some(outcome) => {
                let (style, label) = if outcome.success {
                    (&self.green, "success")
                } else {
                    (&self.red, "failure")
                };
                println!(
                    "Last attempt: {} at {}",
                    style.apply_to(label),
                    outcome.timestamp.to_rfc3339()
                );
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
