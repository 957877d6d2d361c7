// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Bit dilution for Morton (Z-order) indices.

Spreads the bits of a coordinate so that bit `i` lands at bit `3 * i`,
leaving two zero bits between consecutive input bits. Three diluted axes
shifted by 0, 1 and 2 occupy disjoint bit lanes and OR together into a
Morton code: `...z1y1x1z0y0x0`.
*/

use crate::LinearIndex;

/// Bits of an axis coordinate that survive dilution into a 32-bit index.
///
/// Bit 10 of x lands at bit 30 and of y at bit 31; for z it is shifted out
/// of the index, so boxes up to 1024 per axis tile the index range densely.
pub const DILUTE_LANE_BITS: u32 = 11;

/// Mask selecting the lane bits of a coordinate
pub const DILUTE_LANE_MASK: u32 = (1 << DILUTE_LANE_BITS) - 1;

/// Largest per-axis extent whose Morton codes fit in a [`LinearIndex`]
pub const MAX_DENSE_ZORDER_EXTENT: u32 = 1 << (DILUTE_LANE_BITS - 1);

const SHIFT32_MASK: u64 = 0x001F_0000_0000_FFFF;
const SHIFT16_MASK: u64 = 0x001F_0000_FF00_00FF;
const SHIFT8_MASK: u64 = 0x100F_00F0_0F00_F00F;
const SHIFT4_MASK: u64 = 0x10C3_0C30_C30C_30C3;
const SHIFT2_MASK: u64 = 0x1249_2492_4924_9249;

/// Dilute the low [`DILUTE_LANE_BITS`] bits of `value` with a spacing of two.
#[inline(always)]
pub fn dilute_bits(value: u32) -> LinearIndex {
    let mut n = (value & DILUTE_LANE_MASK) as u64;
    n = (n ^ (n << 32)) & SHIFT32_MASK;
    n = (n ^ (n << 16)) & SHIFT16_MASK;
    n = (n ^ (n << 8)) & SHIFT8_MASK;
    n = (n ^ (n << 4)) & SHIFT4_MASK;
    n = (n ^ (n << 2)) & SHIFT2_MASK;
    n as LinearIndex
}
