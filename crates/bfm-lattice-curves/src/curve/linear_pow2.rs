// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Row-major order via mask + shift (power-of-two boxes)

use tracing::debug;

use super::{CurveMode, CurveStrategy};
use crate::coord::LatticeCoord;
use crate::device::DeviceConstants;
use crate::error::{CurveError, CurveResult};
use crate::extent::{floor_log2, Axis, BoxExtent};
use crate::LinearIndex;

/// Row-major lattice order computed with masks and shifts.
///
/// Produces the same indices as [`super::LinearCurve`] but requires every
/// extent to be an exact power of two: `boxX - 1` replaces the modulo and
/// `log2(boxX)` / `log2(boxX * boxY)` replace the multiplications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearCurvePowOfTwo {
    box_x_m1: u32,
    box_y_m1: u32,
    box_z_m1: u32,
    box_x_log2: u32,
    box_xy_log2: u32,
}

#[inline(always)]
fn lane_x<T: LatticeCoord>(box_x_m1: u32, ix: T) -> LinearIndex {
    ix.to_lane() & box_x_m1
}

#[inline(always)]
fn lane_y<T: LatticeCoord>(box_y_m1: u32, box_x_log2: u32, iy: T) -> LinearIndex {
    (iy.to_lane() & box_y_m1).wrapping_shl(box_x_log2)
}

#[inline(always)]
fn lane_z<T: LatticeCoord>(box_z_m1: u32, box_xy_log2: u32, iz: T) -> LinearIndex {
    (iz.to_lane() & box_z_m1).wrapping_shl(box_xy_log2)
}

/// Shift counts for a box, or the first dimension that is not a power of two.
///
/// The log2 values are found by counting right shifts and then checked by
/// shifting back: `value == 1 << log2`.
pub(crate) fn shift_counts(extent: &BoxExtent) -> CurveResult<(u32, u32)> {
    let plane = extent.x() as u64 * extent.y() as u64;
    let box_x_log2 = floor_log2(extent.x() as u64);
    let box_xy_log2 = floor_log2(plane);

    let checks = [
        (Axis::X, extent.x() as u64, box_x_log2),
        (Axis::XY, plane, box_xy_log2),
        (Axis::Z, extent.z() as u64, floor_log2(extent.z() as u64)),
    ];
    for (axis, value, log2) in checks {
        let implied = 1u64 << log2;
        if value != implied {
            return Err(CurveError::NotPowerOfTwo {
                axis,
                value,
                log2,
                implied,
            });
        }
    }

    Ok((box_x_log2, box_xy_log2))
}

impl LinearCurvePowOfTwo {
    /// Shift applied to the y contribution
    pub fn box_x_log2(&self) -> u32 {
        self.box_x_log2
    }

    /// Shift applied to the z contribution
    pub fn box_xy_log2(&self) -> u32 {
        self.box_xy_log2
    }

    /// Wrap-around masks `[boxX-1, boxY-1, boxZ-1]`
    pub fn masks(&self) -> [u32; 3] {
        [self.box_x_m1, self.box_y_m1, self.box_z_m1]
    }
}

impl CurveStrategy for LinearCurvePowOfTwo {
    const MODE: CurveMode = CurveMode::LinearPowOfTwo;

    fn initialize(&mut self, extent: BoxExtent) -> CurveResult<()> {
        let (box_x_log2, box_xy_log2) = shift_counts(&extent).map_err(|e| {
            debug!("power-of-two linear curve rejected box {}: {}", extent, e);
            e
        })?;

        let [box_x_m1, box_y_m1, box_z_m1] = extent.masks();
        *self = Self {
            box_x_m1,
            box_y_m1,
            box_z_m1,
            box_x_log2,
            box_xy_log2,
        };
        debug!(
            "power-of-two linear curve initialized for {} (x shift {}, xy shift {})",
            extent, box_x_log2, box_xy_log2
        );
        Ok(())
    }

    #[inline(always)]
    fn linearize_x<T: LatticeCoord>(&self, ix: T) -> LinearIndex {
        lane_x(self.box_x_m1, ix)
    }

    #[inline(always)]
    fn linearize_y<T: LatticeCoord>(&self, iy: T) -> LinearIndex {
        lane_y(self.box_y_m1, self.box_x_log2, iy)
    }

    #[inline(always)]
    fn linearize_z<T: LatticeCoord>(&self, iz: T) -> LinearIndex {
        lane_z(self.box_z_m1, self.box_xy_log2, iz)
    }

    #[inline(always)]
    fn device_linearize_x<T: LatticeCoord>(c: &DeviceConstants, ix: T) -> LinearIndex {
        lane_x(c.box_x_m1, ix)
    }

    #[inline(always)]
    fn device_linearize_y<T: LatticeCoord>(c: &DeviceConstants, iy: T) -> LinearIndex {
        lane_y(c.box_y_m1, c.box_x_log2, iy)
    }

    #[inline(always)]
    fn device_linearize_z<T: LatticeCoord>(c: &DeviceConstants, iz: T) -> LinearIndex {
        lane_z(c.box_z_m1, c.box_xy_log2, iz)
    }
}
