// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integer types accepted as lattice coordinates

/// An integer type usable as a lattice coordinate.
///
/// Callers keep their own coordinate representation (signed positions from a
/// move engine, unsigned indices from a loop, ...). The curves only need two
/// views of it:
/// - `to_lane`: the low 32 bits in two's complement, used by the mask based
///   curves. For power-of-two extents this wraps negative values correctly.
/// - `wrap`: the Euclidean remainder modulo an extent, used by the modulo
///   based curve for any extent. An extent of 0 (curve never initialized)
///   maps every coordinate to 0.
pub trait LatticeCoord: Copy + Send + Sync {
    fn to_lane(self) -> u32;
    fn wrap(self, extent: u32) -> u32;
}

macro_rules! impl_lattice_coord_unsigned {
    ($($t:ty),*) => {
        $(
            impl LatticeCoord for $t {
                #[inline(always)]
                fn to_lane(self) -> u32 {
                    self as u32
                }

                #[inline(always)]
                fn wrap(self, extent: u32) -> u32 {
                    (self as u64).checked_rem(extent as u64).unwrap_or(0) as u32
                }
            }
        )*
    };
}

macro_rules! impl_lattice_coord_signed {
    ($($t:ty),*) => {
        $(
            impl LatticeCoord for $t {
                #[inline(always)]
                fn to_lane(self) -> u32 {
                    self as i64 as u32
                }

                #[inline(always)]
                fn wrap(self, extent: u32) -> u32 {
                    (self as i64).checked_rem_euclid(extent as i64).unwrap_or(0) as u32
                }
            }
        )*
    };
}

impl_lattice_coord_unsigned!(u8, u16, u32, u64, usize);
impl_lattice_coord_signed!(i8, i16, i32, i64, isize);
