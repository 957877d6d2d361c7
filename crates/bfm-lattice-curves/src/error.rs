// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for lattice index operations

use crate::extent::Axis;

/// Errors raised while configuring or querying a space filling curve.
///
/// Only configuration problems are reported here. Index queries themselves
/// are pure arithmetic and never fail on the hot path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// A box extent of zero was supplied
    #[error("box{axis} must be at least 1, got 0")]
    ZeroExtent { axis: Axis },

    /// A box extent (or the x*y plane) is not an exact power of two
    #[error(
        "Could not determine value for bit shift. Check whether the box size is a power of 2! \
         ( box{axis}={value} =? 2^{log2} = {implied} )"
    )]
    NotPowerOfTwo {
        axis: Axis,
        value: u64,
        log2: u32,
        implied: u64,
    },

    /// A raw mode value outside the defined curve kinds
    #[error("Invalid curve mode: {0} (expected 0=zorder, 1=linear, 2=linear_pow2)")]
    InvalidMode(i64),

    /// Unknown curve name while parsing
    #[error("Unknown curve name: '{0}'")]
    UnknownCurveName(String),

    /// The facade has not been given a box yet
    #[error("Box extent has not been set")]
    BoxNotSet,

    /// The facade was queried before a mode was assigned
    #[error("Curve mode has not been set")]
    ModeNotSet,

    /// The device path was used before constants were staged
    #[error("Device constants have not been staged")]
    DeviceConstantsNotStaged,

    /// The staged device constants disagree with the host-side curve state
    #[error("Device constant '{field}' out of sync: host={host}, device={device}")]
    DeviceMirrorMismatch {
        field: &'static str,
        host: u32,
        device: u32,
    },
}

/// Result type for curve operations
pub type CurveResult<T> = Result<T, CurveError>;
