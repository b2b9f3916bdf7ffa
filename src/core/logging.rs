//! File logging for the TUI.
//!
//! The terminal belongs to ratatui while the app runs, so everything goes
//! to a daily-rolling JSON log under the data directory. `log` macros are
//! bridged into `tracing`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "docs-panel.log";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Log directory below the given data directory.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Install the global subscriber. Keep the returned guard alive for the
/// whole run so buffered lines are flushed on exit.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    let log_dir = log_dir(data_dir);
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory {}: {e}", log_dir.display());
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    // try_init so a second call (tests) only warns.
    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Logging already initialized: {e}");
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        log::debug!("LogTracer not installed: {e}");
    }

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_below_data_dir() {
        let dir = log_dir(Path::new("/tmp/docs-panel"));
        assert_eq!(dir, PathBuf::from("/tmp/docs-panel/logs"));
    }

    #[test]
    fn test_init_creates_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let _guard = init_tui(tmp.path());
        assert!(tmp.path().join("logs").is_dir());
    }
}
