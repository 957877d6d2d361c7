// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # BFM Lattice Curves
//!
//! Maps lattice coordinates `(x, y, z)` of a periodic simulation box to a
//! single linear memory index. The ordering decides how close neighbouring
//! lattice sites end up in memory, which dominates cache behaviour of the
//! Monte-Carlo move kernels.
//!
//! - **Curves**: [`LinearCurve`], [`LinearCurvePowOfTwo`], [`ZOrderCurve`]
//!   behind the [`CurveStrategy`] trait
//! - **Facade**: [`SpaceFillingCurve`] picks one of them at runtime
//! - **Device mirror**: [`DeviceConstants`] + [`ConstantBank`] hold the box
//!   constants read by parallel kernels
//! - **Launch**: host and device batch evaluation
//!
//! ## Usage
//!
//! ```rust
//! use bfm_lattice_curves::{BoxExtent, CurveMode, SpaceFillingCurve};
//!
//! let curve = SpaceFillingCurve::new(BoxExtent::cube(8)?, CurveMode::ZOrder)?;
//! assert_eq!(curve.linearize(1u32, 1, 1), 7);
//! // Periodic wrap-around
//! assert_eq!(curve.linearize(9i32, -7, 1), curve.linearize(1i32, 1, 1));
//! # Ok::<(), bfm_lattice_curves::CurveError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Linear memory index of a lattice site
pub type LinearIndex = u32;

pub mod bits;
pub mod coord;
pub mod curve;
pub mod device;
pub mod error;
pub mod extent;
pub mod facade;
pub mod launch;

pub use bits::{dilute_bits, DILUTE_LANE_BITS, MAX_DENSE_ZORDER_EXTENT};
pub use coord::LatticeCoord;
pub use curve::{CurveMode, CurveStrategy, LinearCurve, LinearCurvePowOfTwo, ZOrderCurve};
pub use device::{verify_mirror, ConstantBank, DeviceConstants};
pub use error::{CurveError, CurveResult};
pub use extent::{floor_log2, Axis, BoxDimensions, BoxExtent};
pub use facade::SpaceFillingCurve;
pub use launch::{
    checked_device_linearize_batch, device_linearize_batch, linearize_batch, stage_for_launch,
};
