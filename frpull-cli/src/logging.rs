//! Subscriber setup: console for progress, an append-only file for warnings.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Timestamp format of the warnings file.
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Build the two-layer subscriber without installing it.
///
/// The console layer honours `RUST_LOG` (default `info`). The file layer
/// takes WARN and above regardless of `RUST_LOG`.
pub fn build_subscriber(
    log_file: &Path,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let warnings = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
        .with_filter(LevelFilter::WARN);

    Ok(tracing_subscriber::registry().with(console).with(warnings))
}

/// Install the subscriber globally. Call once, before any worker starts.
pub fn init_logging(log_file: &Path) -> Result<()> {
    build_subscriber(log_file)?
        .try_init()
        .context("failed to install log subscriber")
}
