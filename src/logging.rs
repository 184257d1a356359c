//! Diagnostic logging setup.
//!
//! Command-line runs log to stderr. The TUI owns the terminal, so it logs to
//! the configured file instead, falling back to one under the user cache dir.

use crate::config::LogConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where diagnostics should go for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Configured file only
    File,
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mindscan={}", config.level)))
}

/// Install the global subscriber.
///
/// A log file that cannot be opened is reported on stderr and logging is
/// skipped rather than aborting the run.
pub fn init(config: &LogConfig, target: LogTarget) {
    let filter = env_filter(config);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init();
        }
        LogTarget::File => {
            let Some(path) = config.file_path() else {
                return;
            };
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => {
                    let _ = tracing_subscriber::registry()
                        .with(filter)
                        .with(
                            tracing_subscriber::fmt::layer()
                                .with_writer(Mutex::new(file))
                                .with_ansi(false),
                        )
                        .try_init();
                }
                Err(e) => eprintln!("Warning: cannot open log file {}: {}", path.display(), e),
            }
        }
    }
}
