//! File logging.
//!
//! The alternate screen owns stdout, so tracing output goes to a daily-rolled
//! file instead. Without an explicit directory the log lands under
//! `$XDG_DATA_HOME/deauther/logs`, then `~/.local/share/deauther/logs`, then
//! the system temp directory.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const APP_NAME: &str = "deauther";
const LOG_DIR: &str = "logs";

/// Keeps the background log writer alive. Logs are flushed on drop.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Directory logs go to when none is given on the command line.
pub fn default_log_dir() -> PathBuf {
    resolve_log_dir(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"))
}

fn resolve_log_dir(
    xdg_data_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> PathBuf {
    let data_dir = match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".local/share"),
        _ => std::env::temp_dir(),
    };
    data_dir.join(APP_NAME).join(LOG_DIR)
}

/// Install the global subscriber writing under `log_dir`.
///
/// `RUST_LOG` wins over `level` when set. Returns `None` if the directory
/// cannot be created or a subscriber is already installed.
pub fn init(log_dir: &Path, level: &str) -> Option<LoggingGuard> {
    std::fs::create_dir_all(log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "deauther.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,deauther_app={level},deauther_tui={level}"))
    });

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");
    Some(LoggingGuard { _guard: guard })
}
