//! Stateless bit codec over a region's 8-byte window.
//!
//! Fields are addressed by absolute bit offset. Big-endian regions allocate
//! bits leftmost-first (bit 0 is the MSB of the addressed byte), little-endian
//! regions rightmost-first. The window is loaded and stored in the region's
//! byte order, so both cases reduce to one shift/mask scheme: shift the
//! window left by the local bit start to clear preceding bits, then
//! arithmetic-shift right to sign-extend and right-align.
//!
//! Callers validate offsets against the layout size; this module only
//! requires that the field fits the window (`local start + bit_size <= 64`).
//! Bytes past the region's real end read as zero and are never written.

use crate::region::{ByteOrder, Region};

/// Bit position of the field inside the 8-byte window.
fn local_start(order: ByteOrder, bit_start: usize, bit_size: usize) -> usize {
    match order {
        ByteOrder::BigEndian => bit_start,
        ByteOrder::LittleEndian => 64 - bit_size - bit_start,
    }
}

/// Read `bit_size` bits at `bit_offset` as a sign-extended value.
pub(crate) fn read_bits(region: &Region, bit_offset: usize, bit_size: usize) -> i64 {
    debug_assert!(bit_size >= 1 && bit_size <= 64);
    let index = bit_offset >> 3;
    let bit_start = bit_offset & 7;
    let local = local_start(region.order(), bit_start, bit_size);
    debug_assert!(local + bit_size <= 64);

    let window = region.get_u64(index);
    ((window << local) as i64) >> (64 - bit_size)
}

/// Write the low `bit_size` bits of `value` at `bit_offset`.
pub(crate) fn write_bits(region: &mut Region, value: i64, bit_offset: usize, bit_size: usize) {
    debug_assert!(bit_size >= 1 && bit_size <= 64);
    let index = bit_offset >> 3;
    let bit_start = bit_offset & 7;
    let local = local_start(region.order(), bit_start, bit_size);
    debug_assert!(local + bit_size <= 64);

    let mut mask = u64::MAX;
    mask <<= local; // clears preceding bits
    mask >>= 64 - bit_size;
    mask <<= 64 - bit_size - local;

    let old = region.get_u64(index);
    let new = (old & !mask) | (((value as u64) << (64 - bit_size - local)) & mask);
    region.put_u64(index, new);
}
