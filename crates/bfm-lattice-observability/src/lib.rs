// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bfm-lattice-observability
//!
//! Logging setup shared by the bfm-lattice tools, with per-crate debug flag
//! support. Library crates only emit `tracing` events; binaries call
//! [`init_logging`] once at startup.
//!
//! ## Features
//! - `file-logging`: per-run log folders with retention (`tracing-appender`)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Crate names accepted by `--debug-{crate}` and `BFM_LATTICE_DEBUG`
pub const KNOWN_CRATES: &[&str] = &["bfm-lattice", "bfm-lattice-curves", "bfm-lattice-config"];
