//! Tracing setup: stderr plus an append-only log file.
//!
//! The file sink lives under the state directory so scheduled headless runs
//! leave a timestamped trail. `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const LOG_FILE: &str = "loginbot.log";

/// Initializes the global subscriber.
///
/// Returns the appender guard, which must stay alive until the process is
/// done logging. Falls back to stderr-only when the log directory cannot be
/// created.
pub fn init(log_dir: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let default_filter = if verbose {
        "loginbot=debug"
    } else {
        "loginbot=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Some(dir) = log_dir
        && std::fs::create_dir_all(dir).is_ok()
    {
        let appender = tracing_appender::rolling::never(dir, LOG_FILE);
        let (file_writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file_writer.and(std::io::stderr))
            .with_ansi(false)
            .init();
        return Some(guard);
    }

    tracing_subscriber::fmt().with_env_filter(filter).init();
    None
}
