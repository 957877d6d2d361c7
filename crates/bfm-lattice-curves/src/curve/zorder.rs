// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Morton (Z-order) lattice curve.

The z curve in 3D for a 2x2x2 box:

```text
  i -> bin  -> (z,y,x)
  0 -> 000b -> (0,0,0)
  1 -> 001b -> (0,0,1)
  2 -> 010b -> (0,1,0)
  3 -> 011b -> (0,1,1)
  4 -> 100b -> (1,0,0)
  5 -> 101b -> (1,0,1)
  6 -> 110b -> (1,1,0)
  7 -> 111b -> (1,1,1)
```

Masking with `extent - 1` before dilution gives periodic wrap-around. Only
power-of-two extents up to [`MAX_DENSE_ZORDER_EXTENT`] tile the index range
densely; other extents are accepted but produce a sparse (and, for
non-power-of-two extents, colliding) mapping.
*/

use tracing::{debug, warn};

use super::{CurveMode, CurveStrategy};
use crate::bits::{dilute_bits, MAX_DENSE_ZORDER_EXTENT};
use crate::coord::LatticeCoord;
use crate::device::DeviceConstants;
use crate::error::CurveResult;
use crate::extent::BoxExtent;
use crate::LinearIndex;

/// Bit-interleaved lattice order for spatial locality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZOrderCurve {
    box_x_m1: u32,
    box_y_m1: u32,
    box_z_m1: u32,
}

#[inline(always)]
fn lane<T: LatticeCoord>(mask: u32, shift: u32, coord: T) -> LinearIndex {
    dilute_bits(coord.to_lane() & mask) << shift
}

impl ZOrderCurve {
    /// Wrap-around masks `[boxX-1, boxY-1, boxZ-1]`
    pub fn masks(&self) -> [u32; 3] {
        [self.box_x_m1, self.box_y_m1, self.box_z_m1]
    }
}

impl CurveStrategy for ZOrderCurve {
    const MODE: CurveMode = CurveMode::ZOrder;

    fn initialize(&mut self, extent: BoxExtent) -> CurveResult<()> {
        let [box_x_m1, box_y_m1, box_z_m1] = extent.masks();
        *self = Self {
            box_x_m1,
            box_y_m1,
            box_z_m1,
        };

        if extent.as_array().iter().any(|&e| e > MAX_DENSE_ZORDER_EXTENT) {
            warn!(
                "z-order curve: box {} exceeds {} sites per axis, indices will overflow the lane budget",
                extent, MAX_DENSE_ZORDER_EXTENT
            );
        } else if !extent.is_power_of_two() {
            debug!(
                "z-order curve: box {} is not a power of two, indices will not be dense",
                extent
            );
        }
        Ok(())
    }

    #[inline(always)]
    fn linearize_x<T: LatticeCoord>(&self, ix: T) -> LinearIndex {
        lane(self.box_x_m1, 0, ix)
    }

    #[inline(always)]
    fn linearize_y<T: LatticeCoord>(&self, iy: T) -> LinearIndex {
        lane(self.box_y_m1, 1, iy)
    }

    #[inline(always)]
    fn linearize_z<T: LatticeCoord>(&self, iz: T) -> LinearIndex {
        lane(self.box_z_m1, 2, iz)
    }

    #[inline(always)]
    fn device_linearize_x<T: LatticeCoord>(c: &DeviceConstants, ix: T) -> LinearIndex {
        lane(c.box_x_m1, 0, ix)
    }

    #[inline(always)]
    fn device_linearize_y<T: LatticeCoord>(c: &DeviceConstants, iy: T) -> LinearIndex {
        lane(c.box_y_m1, 1, iy)
    }

    #[inline(always)]
    fn device_linearize_z<T: LatticeCoord>(c: &DeviceConstants, iz: T) -> LinearIndex {
        lane(c.box_z_m1, 2, iz)
    }
}
