// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Curve Strategies
//!
//! Every curve maps a lattice coordinate to a [`LinearIndex`] through three
//! independent per-axis contributions that are summed:
//!
//! ```text
//! index(x, y, z) = lx(x) + ly(y) + lz(z)
//! ```
//!
//! Each strategy has two evaluation paths:
//! - **host**: reads the extents/masks cached on the instance by `initialize`
//! - **device**: reads the same values from a staged [`DeviceConstants`]
//!   block shared by every worker of a launch
//!
//! Both paths call the same per-axis kernel functions with different
//! parameter sources, so they agree bit-for-bit as long as the staged block
//! mirrors the host instance (see [`crate::device::verify_mirror`]).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::LatticeCoord;
use crate::device::DeviceConstants;
use crate::error::{CurveError, CurveResult};
use crate::extent::{BoxDimensions, BoxExtent};
use crate::LinearIndex;

mod linear;
mod linear_pow2;
mod zorder;

pub use linear::LinearCurve;
pub use linear_pow2::LinearCurvePowOfTwo;
pub use zorder::ZOrderCurve;

/// Which curve the [`crate::SpaceFillingCurve`] facade delegates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CurveMode {
    /// Morton order via bit dilution
    #[serde(rename = "zorder", alias = "z-order", alias = "z_order", alias = "morton")]
    ZOrder = 0,
    /// Row-major order via modulo/multiply
    #[serde(rename = "linear")]
    Linear = 1,
    /// Row-major order via mask/shift (power-of-two boxes only)
    #[serde(rename = "linear_pow2", alias = "linear-pow2", alias = "pow2")]
    LinearPowOfTwo = 2,
}

impl CurveMode {
    pub const ALL: [CurveMode; 3] = [
        CurveMode::ZOrder,
        CurveMode::Linear,
        CurveMode::LinearPowOfTwo,
    ];

    /// Canonical lowercase name (as used in configuration files)
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveMode::ZOrder => "zorder",
            CurveMode::Linear => "linear",
            CurveMode::LinearPowOfTwo => "linear_pow2",
        }
    }

    /// Whether the curve rejects non power-of-two boxes
    pub fn requires_power_of_two(&self) -> bool {
        matches!(self, CurveMode::LinearPowOfTwo)
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CurveMode {
    type Err = CurveError;

    fn from_str(s: &str) -> CurveResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zorder" | "z-order" | "z_order" | "morton" => Ok(CurveMode::ZOrder),
            "linear" => Ok(CurveMode::Linear),
            "linear_pow2" | "linear-pow2" | "linearpowoftwo" | "pow2" => {
                Ok(CurveMode::LinearPowOfTwo)
            }
            _ => Err(CurveError::UnknownCurveName(s.to_string())),
        }
    }
}

impl TryFrom<i64> for CurveMode {
    type Error = CurveError;

    fn try_from(value: i64) -> CurveResult<Self> {
        match value {
            0 => Ok(CurveMode::ZOrder),
            1 => Ok(CurveMode::Linear),
            2 => Ok(CurveMode::LinearPowOfTwo),
            other => Err(CurveError::InvalidMode(other)),
        }
    }
}

impl TryFrom<i32> for CurveMode {
    type Error = CurveError;

    fn try_from(value: i32) -> CurveResult<Self> {
        CurveMode::try_from(value as i64)
    }
}

impl TryFrom<u32> for CurveMode {
    type Error = CurveError;

    fn try_from(value: u32) -> CurveResult<Self> {
        CurveMode::try_from(value as i64)
    }
}

impl From<CurveMode> for u32 {
    fn from(mode: CurveMode) -> Self {
        mode as u32
    }
}

/// Contract shared by all curve kinds.
///
/// Use the concrete types directly (`ZOrderCurve`, ...) when the curve is
/// fixed per call site; the generic methods then inline completely. Use the
/// [`crate::SpaceFillingCurve`] facade when the curve is picked at runtime.
pub trait CurveStrategy: Default + Clone + fmt::Debug + Send + Sync {
    /// Facade mode that selects this strategy
    const MODE: CurveMode;

    /// Derive the cached masks/shifts for a box.
    ///
    /// On error the previous state is left untouched.
    fn initialize(&mut self, extent: BoxExtent) -> CurveResult<()>;

    /// Initialize from any box description (simulation configuration, tuple, ...)
    fn initialize_from<B: BoxDimensions + ?Sized>(&mut self, source: &B) -> CurveResult<()> {
        self.initialize(BoxExtent::from_dimensions(source)?)
    }

    fn linearize_x<T: LatticeCoord>(&self, ix: T) -> LinearIndex;
    fn linearize_y<T: LatticeCoord>(&self, iy: T) -> LinearIndex;
    fn linearize_z<T: LatticeCoord>(&self, iz: T) -> LinearIndex;

    #[inline(always)]
    fn linearize<T: LatticeCoord>(&self, ix: T, iy: T, iz: T) -> LinearIndex {
        self.linearize_x(ix)
            .wrapping_add(self.linearize_y(iy))
            .wrapping_add(self.linearize_z(iz))
    }

    fn device_linearize_x<T: LatticeCoord>(constants: &DeviceConstants, ix: T) -> LinearIndex;
    fn device_linearize_y<T: LatticeCoord>(constants: &DeviceConstants, iy: T) -> LinearIndex;
    fn device_linearize_z<T: LatticeCoord>(constants: &DeviceConstants, iz: T) -> LinearIndex;

    #[inline(always)]
    fn device_linearize<T: LatticeCoord>(
        constants: &DeviceConstants,
        ix: T,
        iy: T,
        iz: T,
    ) -> LinearIndex {
        Self::device_linearize_x(constants, ix)
            .wrapping_add(Self::device_linearize_y(constants, iy))
            .wrapping_add(Self::device_linearize_z(constants, iz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_raw() {
        assert_eq!(CurveMode::try_from(0i32).unwrap(), CurveMode::ZOrder);
        assert_eq!(CurveMode::try_from(1u32).unwrap(), CurveMode::Linear);
        assert_eq!(CurveMode::try_from(2i64).unwrap(), CurveMode::LinearPowOfTwo);
        assert_eq!(
            CurveMode::try_from(3i32).unwrap_err(),
            CurveError::InvalidMode(3)
        );
        assert_eq!(
            CurveMode::try_from(-1i32).unwrap_err(),
            CurveError::InvalidMode(-1)
        );
    }

    #[test]
    fn test_mode_parse_and_display() {
        for mode in CurveMode::ALL {
            assert_eq!(mode.to_string().parse::<CurveMode>().unwrap(), mode);
        }
        assert_eq!("Morton".parse::<CurveMode>().unwrap(), CurveMode::ZOrder);
        assert_eq!(" pow2 ".parse::<CurveMode>().unwrap(), CurveMode::LinearPowOfTwo);
        assert!(matches!(
            "hilbert".parse::<CurveMode>(),
            Err(CurveError::UnknownCurveName(_))
        ));
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&CurveMode::LinearPowOfTwo).unwrap();
        assert_eq!(json, "\"linear_pow2\"");
        let back: CurveMode = serde_json::from_str("\"morton\"").unwrap();
        assert_eq!(back, CurveMode::ZOrder);

        // Serde accepts the same spellings as FromStr
        for (name, mode) in [
            ("z-order", CurveMode::ZOrder),
            ("z_order", CurveMode::ZOrder),
            ("linear-pow2", CurveMode::LinearPowOfTwo),
            ("pow2", CurveMode::LinearPowOfTwo),
        ] {
            let parsed: CurveMode = serde_json::from_str(&format!("\"{}\"", name)).unwrap();
            assert_eq!(parsed, mode, "{}", name);
            assert_eq!(name.parse::<CurveMode>().unwrap(), mode);
        }
    }
}
