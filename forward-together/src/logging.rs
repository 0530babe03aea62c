//! Tracing subscriber setup.
//!
//! The terminal belongs to the TUI, so log lines go to `forward-together.log`
//! in the data directory instead of stderr. `RUST_LOG` controls the filter;
//! the default is `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name of the log inside the data directory.
pub const LOG_FILE: &str = "forward-together.log";

/// Installs the global subscriber, appending to `dir/forward-together.log`.
///
/// Returns the path of the log file.
///
/// # Errors
///
/// Returns `Err` if the directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(path)
}
