// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rejected log level string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log level '{0}' (expected trace, debug, info, warn or error)")]
pub struct InvalidLogLevel(pub String);

/// Map a user-facing level name to an `EnvFilter` level.
///
/// Case-insensitive; `warning` is accepted as an alias of `warn`.
pub fn normalize_level(level: &str) -> Result<&'static str, InvalidLogLevel> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(InvalidLogLevel(level.to_string())),
    }
}

/// Logging options for [`crate::init_logging_with_options`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Base level for crates without a debug flag
    pub level: String,

    /// Also write logs to a per-run folder (requires feature `file-logging`)
    pub file_logging: bool,

    /// Base directory holding `run_*` folders
    pub log_dir: PathBuf,

    /// Number of most recent run folders to keep
    pub retention_runs: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        LoggingOptions {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("INFO"), Ok("info"));
        assert_eq!(normalize_level("Warning"), Ok("warn"));
        assert_eq!(normalize_level(" trace "), Ok("trace"));
        assert_eq!(normalize_level("loud"), Err(InvalidLogLevel("loud".to_string())));
    }

    #[test]
    fn test_default_options() {
        let options = LoggingOptions::default();
        assert_eq!(options.level, "info");
        assert!(!options.file_logging);
        assert_eq!(options.retention_runs, 10);
    }
}
