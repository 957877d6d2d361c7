// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bfm-lattice - Lattice indexing for the bond fluctuation model
//!
//! Maps integer coordinates on a periodic 3D simulation box to linear
//! memory indices. Three orderings are available:
//!
//! - **`zorder`**: Morton order, neighbouring sites stay close in memory
//! - **`linear`**: row-major with modulo wrap, any box size
//! - **`linear_pow2`**: row-major with mask/shift, power-of-two boxes only
//!
//! Every ordering has a host path (reads the curve instance) and a device
//! path (reads a staged [`DeviceConstants`](curves::DeviceConstants) block)
//! that agree bit for bit.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! bfm-lattice = "0.0.1-beta.18"  # Default: rayon batches
//! ```
//!
//! ```rust
//! use bfm_lattice::prelude::*;
//!
//! let curve = SpaceFillingCurve::new(BoxExtent::new(64, 32, 16)?, CurveMode::ZOrder)?;
//! let index = curve.linearize(1i32, 2, 3);
//! assert_eq!(index, curve.linearize(65i32, -30, 19));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): rayon batch evaluation
//! - **`file-logging`**: per-run log folders for the tools
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  bfm-lattice-config / bfm-lattice-observability         │
//! │  (TOML + overrides, tracing setup)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  bfm-lattice-curves                                     │
//! │  (curves, facade, device constants, batch launch)       │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

pub use bfm_lattice_config as config;
pub use bfm_lattice_curves as curves;
pub use bfm_lattice_observability as observability;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::curves::{
        device_linearize_batch, linearize_batch, stage_for_launch, BoxDimensions, BoxExtent,
        ConstantBank, CurveError, CurveMode, CurveResult, CurveStrategy, DeviceConstants,
        LatticeCoord, LinearCurve, LinearCurvePowOfTwo, LinearIndex, SpaceFillingCurve,
        ZOrderCurve,
    };
    pub use crate::config::{load_config, validate_config, LatticeConfig};
    pub use crate::{curve_from_config, open_lattice};
}

/// Build the facade described by a loaded config, after validating it
pub fn curve_from_config(config: &config::LatticeConfig) -> Result<curves::SpaceFillingCurve> {
    config::validate_config(config)?;
    let curve = config
        .lattice
        .build_curve()
        .context("Failed to initialize space filling curve")?;
    Ok(curve)
}

/// Load config, build the curve and stage its device constants.
///
/// Stages into `bank`, or into the process-wide bank when `None`.
/// Returns the config alongside the curve so callers can set up logging
/// from the `[logging]` section.
pub fn open_lattice(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
    bank: Option<&curves::ConstantBank>,
) -> Result<(config::LatticeConfig, curves::SpaceFillingCurve)> {
    let config = config::load_config(config_path, cli_args).context("Failed to load lattice config")?;
    let curve = curve_from_config(&config)?;
    let bank = bank.unwrap_or_else(|| curves::ConstantBank::global());
    let generation = curves::stage_for_launch(bank, &curve)?;
    info!(
        "lattice ready: box {}, curve {}, device generation {}",
        config.lattice.extent()?,
        config.lattice.curve,
        generation
    );
    Ok((config, curve))
}
