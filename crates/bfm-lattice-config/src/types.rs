// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the structs that map to sections in `bfm_lattice.toml`.

use std::path::PathBuf;

use bfm_lattice_curves::{BoxDimensions, BoxExtent, CurveMode, SpaceFillingCurve};
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub lattice: LatticeSection,
    pub logging: LoggingSection,
}

/// Simulation box and curve selection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LatticeSection {
    pub box_x: u32,
    pub box_y: u32,
    pub box_z: u32,
    /// Curve name: "zorder", "linear" or "linear_pow2"
    pub curve: String,
}

impl Default for LatticeSection {
    fn default() -> Self {
        Self {
            box_x: 64,
            box_y: 64,
            box_z: 64,
            curve: CurveMode::ZOrder.as_str().to_string(),
        }
    }
}

impl LatticeSection {
    /// Parsed curve mode
    pub fn curve_mode(&self) -> ConfigResult<CurveMode> {
        Ok(self.curve.parse::<CurveMode>()?)
    }

    /// Validated box extent
    pub fn extent(&self) -> ConfigResult<BoxExtent> {
        Ok(BoxExtent::from_dimensions(self)?)
    }

    /// Facade initialized with this box and mode
    pub fn build_curve(&self) -> ConfigResult<SpaceFillingCurve> {
        Ok(SpaceFillingCurve::new(self.extent()?, self.curve_mode()?)?)
    }
}

impl BoxDimensions for LatticeSection {
    fn box_x(&self) -> u32 {
        self.box_x
    }

    fn box_y(&self) -> u32 {
        self.box_y
    }

    fn box_z(&self) -> u32 {
        self.box_z
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    /// trace, debug, info, warn or error
    pub level: String,
    pub file_logging: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}
