// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
SpaceFillingCurve - runtime-selectable lattice index facade.

Owns one instance of every curve kind and forwards queries to the one
selected by the current [`CurveMode`].

## Design Principles

- **Eager initialization**: `set_box` re-initializes all three curves, so a
  later `set_mode` never needs the box again.
- **Power-of-two gate**: a box the mask/shift curve rejects is only an error
  while (or when switching to) `CurveMode::LinearPowOfTwo`.
- **No implicit mode**: `SpaceFillingCurve::default()` and `with_box` leave
  the mode unset. Unchecked queries then return 0, `checked_linearize`
  reports `CurveError::ModeNotSet`.
*/

use tracing::debug;

use crate::coord::LatticeCoord;
use crate::curve::{CurveMode, CurveStrategy, LinearCurve, LinearCurvePowOfTwo, ZOrderCurve};
use crate::device::DeviceConstants;
use crate::error::{CurveError, CurveResult};
use crate::extent::{BoxDimensions, BoxExtent};
use crate::LinearIndex;

/// Facade over the three curve strategies
#[derive(Debug, Clone, Default)]
pub struct SpaceFillingCurve {
    mode: Option<CurveMode>,
    extent: Option<BoxExtent>,
    z_curve: ZOrderCurve,
    l_curve: LinearCurve,
    p2_curve: LinearCurvePowOfTwo,
    /// Why the power-of-two curve could not take the current box
    pow2_error: Option<CurveError>,
}

impl SpaceFillingCurve {
    /// Initialize every curve for `extent`; the mode stays unset
    pub fn with_box(extent: BoxExtent) -> CurveResult<Self> {
        let mut curve = Self::default();
        curve.set_box(extent)?;
        Ok(curve)
    }

    /// Initialize every curve from a simulation configuration; the mode stays unset
    pub fn from_dimensions<B: BoxDimensions + ?Sized>(source: &B) -> CurveResult<Self> {
        Self::with_box(BoxExtent::from_dimensions(source)?)
    }

    /// Initialize every curve and select `mode`
    pub fn new(extent: BoxExtent, mode: CurveMode) -> CurveResult<Self> {
        let mut curve = Self::with_box(extent)?;
        curve.set_mode(mode)?;
        Ok(curve)
    }

    /// Re-initialize all three curves for a new box.
    ///
    /// # Errors
    ///
    /// `CurveError::NotPowerOfTwo` if the current mode is
    /// `LinearPowOfTwo` and the box is not a power of two. Nothing is
    /// changed in that case.
    pub fn set_box(&mut self, extent: BoxExtent) -> CurveResult<()> {
        let pow2 = self.p2_curve.initialize(extent);
        if let Err(err) = &pow2 {
            if self.mode.is_some_and(|mode| mode.requires_power_of_two()) {
                return Err(err.clone());
            }
            debug!("box {} unavailable for {}: {}", extent, LinearCurvePowOfTwo::MODE, err);
        }

        self.z_curve.initialize(extent)?;
        self.l_curve.initialize(extent)?;
        self.pow2_error = pow2.err();
        self.extent = Some(extent);
        debug!("space filling curve box set to {} (mode {:?})", extent, self.mode);
        Ok(())
    }

    /// [`SpaceFillingCurve::set_box`] from any box description
    pub fn set_box_from<B: BoxDimensions + ?Sized>(&mut self, source: &B) -> CurveResult<()> {
        self.set_box(BoxExtent::from_dimensions(source)?)
    }

    pub fn mode(&self) -> Option<CurveMode> {
        self.mode
    }

    /// Select the curve used by every following query.
    ///
    /// # Errors
    ///
    /// `CurveError::NotPowerOfTwo` when selecting `LinearPowOfTwo` for a box
    /// that curve rejected.
    pub fn set_mode(&mut self, mode: CurveMode) -> CurveResult<()> {
        if mode.requires_power_of_two() {
            if let Some(err) = &self.pow2_error {
                return Err(err.clone());
            }
        }
        self.mode = Some(mode);
        debug!("space filling curve mode set to {}", mode);
        Ok(())
    }

    /// Select the curve from its raw numeric value (0 = zorder, 1 = linear, 2 = linear_pow2)
    pub fn set_mode_raw(&mut self, raw: i32) -> CurveResult<()> {
        self.set_mode(CurveMode::try_from(raw)?)
    }

    /// Box the curves were last initialized for
    pub fn box_extent(&self) -> Option<BoxExtent> {
        self.extent
    }

    /// Whether `CurveMode::LinearPowOfTwo` can be selected for the current box
    pub fn pow2_available(&self) -> bool {
        self.pow2_error.is_none()
    }

    pub fn zorder(&self) -> &ZOrderCurve {
        &self.z_curve
    }

    pub fn linear(&self) -> &LinearCurve {
        &self.l_curve
    }

    pub fn linear_pow2(&self) -> &LinearCurvePowOfTwo {
        &self.p2_curve
    }

    /// Constants a launch layer must stage to mirror this curve on the device
    pub fn device_constants(&self) -> DeviceConstants {
        self.extent
            .map(DeviceConstants::from_extent)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Host path
    // ------------------------------------------------------------------

    #[inline]
    pub fn linearize<T: LatticeCoord>(&self, ix: T, iy: T, iz: T) -> LinearIndex {
        match self.mode {
            Some(CurveMode::ZOrder) => self.z_curve.linearize(ix, iy, iz),
            Some(CurveMode::Linear) => self.l_curve.linearize(ix, iy, iz),
            Some(CurveMode::LinearPowOfTwo) => self.p2_curve.linearize(ix, iy, iz),
            None => LinearIndex::default(),
        }
    }

    #[inline]
    pub fn linearize_x<T: LatticeCoord>(&self, ix: T) -> LinearIndex {
        match self.mode {
            Some(CurveMode::ZOrder) => self.z_curve.linearize_x(ix),
            Some(CurveMode::Linear) => self.l_curve.linearize_x(ix),
            Some(CurveMode::LinearPowOfTwo) => self.p2_curve.linearize_x(ix),
            None => LinearIndex::default(),
        }
    }

    #[inline]
    pub fn linearize_y<T: LatticeCoord>(&self, iy: T) -> LinearIndex {
        match self.mode {
            Some(CurveMode::ZOrder) => self.z_curve.linearize_y(iy),
            Some(CurveMode::Linear) => self.l_curve.linearize_y(iy),
            Some(CurveMode::LinearPowOfTwo) => self.p2_curve.linearize_y(iy),
            None => LinearIndex::default(),
        }
    }

    #[inline]
    pub fn linearize_z<T: LatticeCoord>(&self, iz: T) -> LinearIndex {
        match self.mode {
            Some(CurveMode::ZOrder) => self.z_curve.linearize_z(iz),
            Some(CurveMode::Linear) => self.l_curve.linearize_z(iz),
            Some(CurveMode::LinearPowOfTwo) => self.p2_curve.linearize_z(iz),
            None => LinearIndex::default(),
        }
    }

    /// Like [`SpaceFillingCurve::linearize`] but reports an unset mode
    pub fn checked_linearize<T: LatticeCoord>(&self, ix: T, iy: T, iz: T) -> CurveResult<LinearIndex> {
        match self.mode {
            Some(_) => Ok(self.linearize(ix, iy, iz)),
            None => Err(CurveError::ModeNotSet),
        }
    }

    // ------------------------------------------------------------------
    // Device path: mode from the facade, box values from staged constants
    // ------------------------------------------------------------------

    #[inline]
    pub fn device_linearize<T: LatticeCoord>(
        &self,
        constants: &DeviceConstants,
        ix: T,
        iy: T,
        iz: T,
    ) -> LinearIndex {
        self.mode
            .map_or(0, |mode| mode.device_linearize(constants, ix, iy, iz))
    }

    #[inline]
    pub fn device_linearize_x<T: LatticeCoord>(&self, constants: &DeviceConstants, ix: T) -> LinearIndex {
        self.mode.map_or(0, |mode| mode.device_linearize_x(constants, ix))
    }

    #[inline]
    pub fn device_linearize_y<T: LatticeCoord>(&self, constants: &DeviceConstants, iy: T) -> LinearIndex {
        self.mode.map_or(0, |mode| mode.device_linearize_y(constants, iy))
    }

    #[inline]
    pub fn device_linearize_z<T: LatticeCoord>(&self, constants: &DeviceConstants, iz: T) -> LinearIndex {
        self.mode.map_or(0, |mode| mode.device_linearize_z(constants, iz))
    }
}

/// Device-path dispatch for launch layers that carry only a mode
impl CurveMode {
    #[inline]
    pub fn device_linearize<T: LatticeCoord>(
        self,
        constants: &DeviceConstants,
        ix: T,
        iy: T,
        iz: T,
    ) -> LinearIndex {
        match self {
            CurveMode::ZOrder => ZOrderCurve::device_linearize(constants, ix, iy, iz),
            CurveMode::Linear => LinearCurve::device_linearize(constants, ix, iy, iz),
            CurveMode::LinearPowOfTwo => LinearCurvePowOfTwo::device_linearize(constants, ix, iy, iz),
        }
    }

    #[inline]
    pub fn device_linearize_x<T: LatticeCoord>(self, constants: &DeviceConstants, ix: T) -> LinearIndex {
        match self {
            CurveMode::ZOrder => ZOrderCurve::device_linearize_x(constants, ix),
            CurveMode::Linear => LinearCurve::device_linearize_x(constants, ix),
            CurveMode::LinearPowOfTwo => LinearCurvePowOfTwo::device_linearize_x(constants, ix),
        }
    }

    #[inline]
    pub fn device_linearize_y<T: LatticeCoord>(self, constants: &DeviceConstants, iy: T) -> LinearIndex {
        match self {
            CurveMode::ZOrder => ZOrderCurve::device_linearize_y(constants, iy),
            CurveMode::Linear => LinearCurve::device_linearize_y(constants, iy),
            CurveMode::LinearPowOfTwo => LinearCurvePowOfTwo::device_linearize_y(constants, iy),
        }
    }

    #[inline]
    pub fn device_linearize_z<T: LatticeCoord>(self, constants: &DeviceConstants, iz: T) -> LinearIndex {
        match self {
            CurveMode::ZOrder => ZOrderCurve::device_linearize_z(constants, iz),
            CurveMode::Linear => LinearCurve::device_linearize_z(constants, iz),
            CurveMode::LinearPowOfTwo => LinearCurvePowOfTwo::device_linearize_z(constants, iz),
        }
    }
}
