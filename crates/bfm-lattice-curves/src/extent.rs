// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Periodic simulation box extents

use core::fmt;

use crate::error::{CurveError, CurveResult};

/// Box axis (or the x*y plane, for power-of-two diagnostics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    XY,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::XY => "XY",
        };
        f.write_str(name)
    }
}

/// Anything that can describe the size of a periodic box.
///
/// Simulation configurations ("ingredients") implement this so curves can be
/// initialized directly from them. Only the three scalar extents are copied;
/// the source is never retained.
pub trait BoxDimensions {
    fn box_x(&self) -> u32;
    fn box_y(&self) -> u32;
    fn box_z(&self) -> u32;
}

/// Size of the periodic simulation box. Every extent is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxExtent {
    x: u32,
    y: u32,
    z: u32,
}

impl BoxExtent {
    /// Create a box extent, rejecting zero-sized axes
    pub fn new(x: u32, y: u32, z: u32) -> CurveResult<Self> {
        for (axis, value) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
            if value == 0 {
                return Err(CurveError::ZeroExtent { axis });
            }
        }
        Ok(Self { x, y, z })
    }

    /// Copy the extents out of any [`BoxDimensions`] source
    pub fn from_dimensions<B: BoxDimensions + ?Sized>(source: &B) -> CurveResult<Self> {
        Self::new(source.box_x(), source.box_y(), source.box_z())
    }

    /// Cubic box with the same extent on every axis
    pub fn cube(edge: u32) -> CurveResult<Self> {
        Self::new(edge, edge, edge)
    }

    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> u32 {
        self.z
    }

    /// Number of lattice sites in the box
    pub fn volume(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }

    /// `extent - 1` for every axis (the wrap-around masks)
    pub fn masks(&self) -> [u32; 3] {
        [self.x - 1, self.y - 1, self.z - 1]
    }

    /// True when every extent is an exact power of two
    pub fn is_power_of_two(&self) -> bool {
        self.x.is_power_of_two() && self.y.is_power_of_two() && self.z.is_power_of_two()
    }

    pub fn as_array(&self) -> [u32; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for BoxExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl BoxDimensions for BoxExtent {
    fn box_x(&self) -> u32 {
        self.x
    }
    fn box_y(&self) -> u32 {
        self.y
    }
    fn box_z(&self) -> u32 {
        self.z
    }
}

impl BoxDimensions for (u32, u32, u32) {
    fn box_x(&self) -> u32 {
        self.0
    }
    fn box_y(&self) -> u32 {
        self.1
    }
    fn box_z(&self) -> u32 {
        self.2
    }
}

impl BoxDimensions for [u32; 3] {
    fn box_x(&self) -> u32 {
        self[0]
    }
    fn box_y(&self) -> u32 {
        self[1]
    }
    fn box_z(&self) -> u32 {
        self[2]
    }
}

impl TryFrom<[u32; 3]> for BoxExtent {
    type Error = CurveError;

    fn try_from(value: [u32; 3]) -> CurveResult<Self> {
        Self::new(value[0], value[1], value[2])
    }
}

/// Count how often `value` can be shifted right before reaching zero.
///
/// This is `floor(log2(value))` for non-zero input and 0 for zero.
#[inline]
pub fn floor_log2(value: u64) -> u32 {
    let mut log2 = 0;
    let mut remaining = value >> 1;
    while remaining != 0 {
        log2 += 1;
        remaining >>= 1;
    }
    log2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_extent_rejected() {
        let err = BoxExtent::new(8, 0, 8).unwrap_err();
        assert_eq!(err, CurveError::ZeroExtent { axis: Axis::Y });
    }

    #[test]
    fn test_volume_and_masks() {
        let extent = BoxExtent::new(4, 8, 16).unwrap();
        assert_eq!(extent.volume(), 512);
        assert_eq!(extent.masks(), [3, 7, 15]);
        assert!(extent.is_power_of_two());
        assert!(!BoxExtent::new(3, 4, 8).unwrap().is_power_of_two());
    }

    #[test]
    fn test_from_dimensions_tuple() {
        let extent = BoxExtent::from_dimensions(&(2u32, 3u32, 5u32)).unwrap();
        assert_eq!(extent.as_array(), [2, 3, 5]);
        assert_eq!(extent.to_string(), "2x3x5");
    }

    #[test]
    fn test_floor_log2() {
        assert_eq!(floor_log2(0), 0);
        assert_eq!(floor_log2(1), 0);
        assert_eq!(floor_log2(2), 1);
        assert_eq!(floor_log2(3), 1);
        assert_eq!(floor_log2(1024), 10);
        assert_eq!(floor_log2(1025), 10);
    }
}
