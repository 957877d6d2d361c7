// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Device-side constant mirror.

Parallel kernels do not read the curve instance they were launched from.
They read one small, read-only block of box constants shared by every
worker (the equivalent of GPU constant memory). This module defines that
block and the bank that holds it between launches.

## Synchronization contract

1. Host code initializes the curve (`SpaceFillingCurve::set_box`).
2. The launch layer stages `curve.device_constants()` into a [`ConstantBank`]
   (and uploads [`DeviceConstants::as_bytes`] when a real device is used).
3. Kernels run inside [`ConstantBank::launch`], which holds a read guard for
   the whole batch. Staging takes the write side, so the block can never
   change while reads are in flight.

Nothing here checks that step 2 happened after step 1. Call
[`verify_mirror`] when in doubt; a stale block silently produces indices
for the old box.
*/

use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CurveError, CurveResult};
use crate::extent::{floor_log2, BoxExtent};
use crate::facade::SpaceFillingCurve;

/// Box constants as seen by device code.
///
/// `#[repr(C)]`, eight `u32` slots (32 bytes), suitable for a uniform
/// buffer. The log2 slots are only meaningful for power-of-two boxes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct DeviceConstants {
    pub box_x: u32,
    pub box_y: u32,
    pub box_z: u32,
    pub box_x_m1: u32,
    pub box_y_m1: u32,
    pub box_z_m1: u32,
    pub box_x_log2: u32,
    pub box_xy_log2: u32,
}

impl DeviceConstants {
    /// Derive every slot from a box
    pub fn from_extent(extent: BoxExtent) -> Self {
        let [box_x_m1, box_y_m1, box_z_m1] = extent.masks();
        Self {
            box_x: extent.x(),
            box_y: extent.y(),
            box_z: extent.z(),
            box_x_m1,
            box_y_m1,
            box_z_m1,
            box_x_log2: floor_log2(extent.x() as u64),
            box_xy_log2: floor_log2(extent.x() as u64 * extent.y() as u64),
        }
    }

    /// Raw bytes for upload to a device buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Named slots, in memory order
    pub fn slots(&self) -> [(&'static str, u32); 8] {
        [
            ("box_x", self.box_x),
            ("box_y", self.box_y),
            ("box_z", self.box_z),
            ("box_x_m1", self.box_x_m1),
            ("box_y_m1", self.box_y_m1),
            ("box_z_m1", self.box_z_m1),
            ("box_x_log2", self.box_x_log2),
            ("box_xy_log2", self.box_xy_log2),
        ]
    }
}

/// Check that a staged block mirrors the host-side curve exactly.
///
/// # Errors
///
/// Returns `CurveError::DeviceMirrorMismatch` naming the first slot that differs.
pub fn verify_mirror(curve: &SpaceFillingCurve, device: &DeviceConstants) -> CurveResult<()> {
    let host = curve.device_constants();
    for ((field, host_value), (_, device_value)) in host.slots().into_iter().zip(device.slots()) {
        if host_value != device_value {
            return Err(CurveError::DeviceMirrorMismatch {
                field,
                host: host_value,
                device: device_value,
            });
        }
    }
    Ok(())
}

/// Global bank shared by all launches in the process
static GLOBAL_BANK: Lazy<ConstantBank> = Lazy::new(ConstantBank::new);

/// Write-once-per-launch storage for [`DeviceConstants`]
#[derive(Debug, Default)]
pub struct ConstantBank {
    slot: RwLock<Option<DeviceConstants>>,
    generation: AtomicU64,
}

impl ConstantBank {
    /// Create an empty bank (nothing staged, generation 0)
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Process-wide bank
    pub fn global() -> &'static ConstantBank {
        &GLOBAL_BANK
    }

    /// Stage a new block, returning its generation.
    ///
    /// Blocks until every running [`ConstantBank::launch`] has finished.
    pub fn stage(&self, constants: DeviceConstants) -> u64 {
        let mut slot = self.slot.write();
        *slot = Some(constants);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            "staged device constants gen={} box={}x{}x{}",
            generation, constants.box_x, constants.box_y, constants.box_z
        );
        generation
    }

    /// Drop the staged block
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    pub fn is_staged(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Number of blocks staged so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Copy of the staged block
    pub fn snapshot(&self) -> CurveResult<DeviceConstants> {
        (*self.slot.read()).ok_or(CurveError::DeviceConstantsNotStaged)
    }

    /// Run `kernel` against the staged block, holding it immutable meanwhile
    pub fn launch<R>(&self, kernel: impl FnOnce(&DeviceConstants) -> R) -> CurveResult<R> {
        let guard = self.slot.read();
        let constants = guard.as_ref().ok_or(CurveError::DeviceConstantsNotStaged)?;
        Ok(kernel(constants))
    }
}
