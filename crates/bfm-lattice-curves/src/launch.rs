// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Batch Evaluation
//!
//! Evaluates many lattice coordinates at once, the way simulation kernels
//! touch the lattice. Every coordinate is independent, so batches run in
//! parallel (rayon, `parallel` feature) without locks or atomics.
//!
//! The device variant emulates a kernel launch: it stages nothing itself,
//! takes one read guard on the [`ConstantBank`] and evaluates every
//! coordinate from the staged block only.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::coord::LatticeCoord;
use crate::curve::CurveMode;
use crate::device::{verify_mirror, ConstantBank, DeviceConstants};
use crate::error::{CurveError, CurveResult};
use crate::facade::SpaceFillingCurve;
use crate::LinearIndex;

/// Stage the facade's mirror into `bank`, returning the new generation
pub fn stage_for_launch(bank: &ConstantBank, curve: &SpaceFillingCurve) -> CurveResult<u64> {
    let extent = curve.box_extent().ok_or(CurveError::BoxNotSet)?;
    let constants = curve.device_constants();
    let generation = bank.stage(constants);
    debug!("launch staging for box {} -> generation {}", extent, generation);
    Ok(generation)
}

/// Host path: linearize every coordinate with the facade's own state
pub fn linearize_batch<T: LatticeCoord>(
    curve: &SpaceFillingCurve,
    coords: &[[T; 3]],
) -> CurveResult<Vec<LinearIndex>> {
    let mode = curve.mode().ok_or(CurveError::ModeNotSet)?;
    debug!("host batch: {} sites, mode {}", coords.len(), mode);

    #[cfg(feature = "parallel")]
    let indices: Vec<LinearIndex> = coords
        .par_iter()
        .map(|&[x, y, z]| curve.linearize(x, y, z))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let indices: Vec<LinearIndex> = coords
        .iter()
        .map(|&[x, y, z]| curve.linearize(x, y, z))
        .collect();

    Ok(indices)
}

/// One kernel pass over `coords`, reading only `constants`
fn run_kernel<T: LatticeCoord>(
    mode: CurveMode,
    constants: &DeviceConstants,
    coords: &[[T; 3]],
) -> Vec<LinearIndex> {
    #[cfg(feature = "parallel")]
    let indices: Vec<LinearIndex> = coords
        .par_iter()
        .map(|&[x, y, z]| mode.device_linearize(constants, x, y, z))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let indices: Vec<LinearIndex> = coords
        .iter()
        .map(|&[x, y, z]| mode.device_linearize(constants, x, y, z))
        .collect();

    indices
}

/// Device path: linearize every coordinate from the constants staged in `bank`
pub fn device_linearize_batch<T: LatticeCoord>(
    bank: &ConstantBank,
    mode: CurveMode,
    coords: &[[T; 3]],
) -> CurveResult<Vec<LinearIndex>> {
    bank.launch(|constants| {
        debug!(
            "device batch: {} sites, mode {}, generation {}",
            coords.len(),
            mode,
            bank.generation()
        );
        run_kernel(mode, constants, coords)
    })
}

/// Device path with the mirror checked against the host curve first.
///
/// The check and the batch share one launch guard, so a concurrent
/// [`ConstantBank::stage`] either lands before the check or waits for the
/// batch to finish.
///
/// # Errors
///
/// `CurveError::DeviceMirrorMismatch` if `bank` holds constants for a
/// different box than `curve`.
pub fn checked_device_linearize_batch<T: LatticeCoord>(
    bank: &ConstantBank,
    curve: &SpaceFillingCurve,
    coords: &[[T; 3]],
) -> CurveResult<Vec<LinearIndex>> {
    let mode = curve.mode().ok_or(CurveError::ModeNotSet)?;
    bank.launch(|constants| {
        verify_mirror(curve, constants)?;
        debug!(
            "checked device batch: {} sites, mode {}, generation {}",
            coords.len(),
            mode,
            bank.generation()
        );
        Ok(run_kernel(mode, constants, coords))
    })?
}
