//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! Loader diagnostics (rejected option values, unknown settings, URLs no mode
//! handles, modes missing a host capability) are `tracing` events, so where
//! they end up is decided here. `RUST_LOG` overrides the default filter.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sload_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/sload/sload.log`; the directory is created if missing.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sload")?;
    Ok(xdg_dirs.place_state_file("sload.log")?)
}

/// Route diagnostics to the state log file and return its path.
///
/// Fails when the file cannot be opened or a subscriber is already installed;
/// callers fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!("sload logging initialized at {}", path.display());
    Ok(path)
}

/// Diagnostics to stderr only. A no-op if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
