//! Diagnostic logging to a file.
//!
//! The terminal UI owns stdout and stderr, so `tracing` output is only
//! captured when a debug log path is supplied. Filtering follows `RUST_LOG`
//! and defaults to `info`.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const DEBUG_LOG_ENV: &str = "PARLEY_DEBUG_LOG";

/// Pick the debug log path: the command-line flag wins over the environment.
pub fn resolve_debug_log_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(DEBUG_LOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber that appends plain-text events to `path`.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "debug logging started");
    Ok(())
}
