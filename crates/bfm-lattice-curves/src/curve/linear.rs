// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Row-major order via modulo (any box size)

use super::{CurveMode, CurveStrategy};
use crate::coord::LatticeCoord;
use crate::device::DeviceConstants;
use crate::error::CurveResult;
use crate::extent::BoxExtent;
use crate::LinearIndex;

/// Row-major lattice order: `x + y * boxX + z * boxX * boxY`.
///
/// Works for every box size, at the price of a division per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearCurve {
    box_x: u32,
    box_y: u32,
    box_z: u32,
}

#[inline(always)]
fn lane_x<T: LatticeCoord>(box_x: u32, ix: T) -> LinearIndex {
    ix.wrap(box_x)
}

#[inline(always)]
fn lane_y<T: LatticeCoord>(box_x: u32, box_y: u32, iy: T) -> LinearIndex {
    iy.wrap(box_y).wrapping_mul(box_x)
}

#[inline(always)]
fn lane_z<T: LatticeCoord>(box_x: u32, box_y: u32, box_z: u32, iz: T) -> LinearIndex {
    iz.wrap(box_z).wrapping_mul(box_x).wrapping_mul(box_y)
}

impl LinearCurve {
    pub fn box_extent(&self) -> [u32; 3] {
        [self.box_x, self.box_y, self.box_z]
    }
}

impl CurveStrategy for LinearCurve {
    const MODE: CurveMode = CurveMode::Linear;

    fn initialize(&mut self, extent: BoxExtent) -> CurveResult<()> {
        self.box_x = extent.x();
        self.box_y = extent.y();
        self.box_z = extent.z();
        tracing::trace!("linear curve initialized for {}", extent);
        Ok(())
    }

    #[inline(always)]
    fn linearize_x<T: LatticeCoord>(&self, ix: T) -> LinearIndex {
        lane_x(self.box_x, ix)
    }

    #[inline(always)]
    fn linearize_y<T: LatticeCoord>(&self, iy: T) -> LinearIndex {
        lane_y(self.box_x, self.box_y, iy)
    }

    #[inline(always)]
    fn linearize_z<T: LatticeCoord>(&self, iz: T) -> LinearIndex {
        lane_z(self.box_x, self.box_y, self.box_z, iz)
    }

    #[inline(always)]
    fn device_linearize_x<T: LatticeCoord>(c: &DeviceConstants, ix: T) -> LinearIndex {
        lane_x(c.box_x, ix)
    }

    #[inline(always)]
    fn device_linearize_y<T: LatticeCoord>(c: &DeviceConstants, iy: T) -> LinearIndex {
        lane_y(c.box_x, c.box_y, iy)
    }

    #[inline(always)]
    fn device_linearize_z<T: LatticeCoord>(c: &DeviceConstants, iz: T) -> LinearIndex {
        lane_z(c.box_x, c.box_y, c.box_z, iz)
    }
}
