//! Typed member accessors bound to one layout.
//!
//! Every member reserves its `(alignment, bit size)` against its owning
//! [`Layout`] at construction and holds an explicit handle back to it;
//! values live only in the bound region. Members with the natural fixed
//! width use direct byte-order-aware access; bitfield variants (the
//! `::bits` constructors) go through the generic bit codec.

mod enums;
mod floats;
mod integers;
mod refs;
mod strings;

pub use enums::{Enum16, Enum32, Enum64, Enum8, Ordinal};
pub use floats::{Float32, Float64};
pub use integers::{
    BitField, Bool, Signed16, Signed32, Signed64, Signed8, Unsigned16, Unsigned32, Unsigned8,
};
pub use refs::{Reference32, Reference64};
pub use strings::Utf8String;

use crate::bits;
use crate::layout::Layout;

/// Base of every member: the owning layout plus a fixed bit reservation.
///
/// Custom member types can build on this the same way the predefined
/// catalogue does.
#[derive(Debug, Clone)]
pub struct Member {
    layout: Layout,
    bit_offset: usize,
    bit_size: usize,
}

impl Member {
    /// Reserve a member on `layout`. `alignment` is the desired alignment
    /// in bytes, or 0 for a bitfield.
    pub fn new(layout: &Layout, alignment: usize, bit_size: usize) -> Self {
        let bit_offset = layout.reserve(alignment, bit_size);
        Self {
            layout: layout.clone(),
            bit_offset,
            bit_size,
        }
    }

    /// The layout this member belongs to.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Bit offset relative to the owning layout.
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Width in bits.
    pub fn bit_size(&self) -> usize {
        self.bit_size
    }

    fn absolute_bit_offset(&self) -> usize {
        self.layout.position() * 8 + self.bit_offset
    }

    /// Absolute byte index of the member's first byte in the region.
    fn byte_index(&self) -> usize {
        self.layout.position() + (self.bit_offset >> 3)
    }

    /// Natural-width members always start on a byte boundary; a bitfield of
    /// the same width may not, and must take the codec path instead.
    fn is_byte_aligned(&self) -> bool {
        self.bit_offset & 7 == 0
    }

    /// Codec path; in-bounds by construction.
    fn read_raw(&self) -> i64 {
        let region = self.layout.region();
        let value = bits::read_bits(&region.borrow(), self.absolute_bit_offset(), self.bit_size);
        value
    }

    fn write_raw(&self, value: i64) {
        let region = self.layout.region();
        bits::write_bits(
            &mut region.borrow_mut(),
            value,
            self.absolute_bit_offset(),
            self.bit_size,
        );
    }

    // Direct aligned access for natural-width members.

    fn get_u8(&self) -> u8 {
        self.layout.region().borrow().get_u8(self.byte_index())
    }

    fn put_u8(&self, value: u8) {
        self.layout
            .region()
            .borrow_mut()
            .put_u8(self.byte_index(), value);
    }

    fn get_u16(&self) -> u16 {
        self.layout.region().borrow().get_u16(self.byte_index())
    }

    fn put_u16(&self, value: u16) {
        self.layout
            .region()
            .borrow_mut()
            .put_u16(self.byte_index(), value);
    }

    fn get_u32(&self) -> u32 {
        self.layout.region().borrow().get_u32(self.byte_index())
    }

    fn put_u32(&self, value: u32) {
        self.layout
            .region()
            .borrow_mut()
            .put_u32(self.byte_index(), value);
    }

    fn get_u64(&self) -> u64 {
        self.layout.region().borrow().get_u64(self.byte_index())
    }

    fn put_u64(&self, value: u64) {
        self.layout
            .region()
            .borrow_mut()
            .put_u64(self.byte_index(), value);
    }
}
