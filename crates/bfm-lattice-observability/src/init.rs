// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with feature `file-logging`, each run also gets a
//! timestamped folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── bfm-lattice.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{normalize_level, LoggingOptions};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps file writers alive; logs are flushed when this is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder, when file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Filter combining debug flags with a base level (`info` when `None`)
pub fn build_filter(debug_flags: &CrateDebugFlags, level: Option<&str>) -> Result<EnvFilter> {
    let base = match level {
        Some(level) => normalize_level(level)?,
        None => "info",
    };
    let directives = debug_flags.to_filter_string_with_default(base);
    EnvFilter::try_new(&directives).with_context(|| format!("Invalid log filter '{}'", directives))
}

/// Initialize console logging
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags
/// * `level` - Base level for everything else (default: `info`)
///
/// # Errors
///
/// Fails on an unknown level or if a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, level: Option<&str>) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, level)?;
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(filter);

    Registry::default()
        .with(console_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: None,
        log_dir: None,
    })
}

/// Initialize logging from [`LoggingOptions`]
///
/// Falls back to console-only logging (with a warning) when file logging is
/// requested but the crate was built without `file-logging`.
pub fn init_logging_with_options(
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<LoggingGuard> {
    if !options.file_logging {
        return init_logging(debug_flags, Some(&options.level));
    }

    init_file_logging(debug_flags, options)
}

#[cfg(not(feature = "file-logging"))]
fn init_file_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let guard = init_logging(debug_flags, Some(&options.level))?;
    tracing::warn!(
        "file logging requested ({}) but bfm-lattice-observability was built without 'file-logging'",
        options.log_dir.display()
    );
    Ok(guard)
}

#[cfg(feature = "file-logging")]
fn init_file_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    use tracing_appender::rolling;

    let run_folder = options.log_dir.join(run_folder_name(Utc::now()));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    cleanup_old_runs(&options.log_dir, options.retention_runs)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(build_filter(debug_flags, Some(&options.level))?);

    let file_appender = rolling::never(&run_folder, "bfm-lattice.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(build_filter(debug_flags, Some(&options.level))?);

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guard: Some(guard),
        log_dir: Some(run_folder),
    })
}

/// Folder name for a run started at `started`
pub fn run_folder_name(started: DateTime<Utc>) -> String {
    format!("{}{}", RUN_PREFIX, started.format(RUN_TIMESTAMP_FORMAT))
}

/// Start time encoded in a run folder name
pub fn parse_run_folder(name: &str) -> Option<DateTime<Utc>> {
    let timestamp = name.strip_prefix(RUN_PREFIX)?;
    let naive = NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Delete all but the `keep` most recent run folders under `base_log_dir`.
///
/// Returns the number of folders removed. Folders that fail to delete are
/// reported on stderr and skipped; logging is not up yet at this point.
pub fn cleanup_old_runs(base_log_dir: &Path, keep: usize) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    let entries = std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(started) = path.file_name().and_then(|n| n.to_str()).and_then(parse_run_folder) {
            runs.push((path, started));
        }
    }

    if runs.len() <= keep {
        return Ok(0);
    }

    // Oldest first
    runs.sort_by_key(|(_, started)| *started);
    let excess = runs.len() - keep;
    let mut removed = 0;
    for (path, _) in runs.iter().take(excess) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}
