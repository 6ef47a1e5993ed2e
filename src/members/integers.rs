//! Boolean, signed/unsigned integer and unsigned bitfield members.

use super::Member;
use crate::error::{Result, StruktError};
use crate::layout::Layout;

/// An 8-bit boolean: nonzero is `true`. The bitfield variant uses the
/// generic codec; `true` writes all ones so any width reads back nonzero.
#[derive(Debug, Clone)]
pub struct Bool {
    member: Member,
}

impl Bool {
    pub fn new(layout: &Layout) -> Self {
        Self {
            member: Member::new(layout, 1, 8),
        }
    }

    /// Declare as a bitfield of `bit_size` bits. Widths outside 1..=64 are
    /// rejected at construction.
    pub fn bits(layout: &Layout, bit_size: usize) -> Result<Self> {
        if bit_size == 0 || bit_size > 64 {
            return Err(StruktError::invalid_parameter(
                "bit_size",
                "bitfield width must be 1..=64",
            ));
        }
        Ok(Self {
            member: Member::new(layout, 0, bit_size),
        })
    }

    pub fn get(&self) -> bool {
        if self.member.bit_size() == 8 && self.member.is_byte_aligned() {
            self.member.get_u8() != 0
        } else {
            self.member.read_raw() != 0
        }
    }

    pub fn set(&self, value: bool) {
        if self.member.bit_size() == 8 && self.member.is_byte_aligned() {
            self.member.put_u8(if value { 0xFF } else { 0 });
        } else {
            self.member.write_raw(if value { -1 } else { 0 });
        }
    }

    pub fn member(&self) -> &Member {
        &self.member
    }
}

macro_rules! signed_member {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $align:expr, $width:expr, $get:ident, $put:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            member: Member,
        }

        impl $name {
            pub fn new(layout: &Layout) -> Self {
                Self {
                    member: Member::new(layout, $align, $width),
                }
            }

            /// Declare as a bitfield of `bit_size` bits (sign-extended on
            /// read). Widths outside 1..=64 are rejected at construction.
            pub fn bits(layout: &Layout, bit_size: usize) -> Result<Self> {
                if bit_size == 0 || bit_size > 64 {
                    return Err(StruktError::invalid_parameter(
                        "bit_size",
                        "bitfield width must be 1..=64",
                    ));
                }
                Ok(Self {
                    member: Member::new(layout, 0, bit_size),
                })
            }

            pub fn get(&self) -> $ty {
                if self.member.bit_size() == $width && self.member.is_byte_aligned() {
                    self.member.$get() as $ty
                } else {
                    self.member.read_raw() as $ty
                }
            }

            pub fn set(&self, value: $ty) {
                if self.member.bit_size() == $width && self.member.is_byte_aligned() {
                    self.member.$put(value as _);
                } else {
                    self.member.write_raw(value as i64);
                }
            }

            pub fn member(&self) -> &Member {
                &self.member
            }
        }
    };
}

macro_rules! unsigned_member {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $align:expr, $width:expr, $get:ident, $put:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            member: Member,
        }

        impl $name {
            pub fn new(layout: &Layout) -> Self {
                Self {
                    member: Member::new(layout, $align, $width),
                }
            }

            /// Declare as a bitfield of `bit_size` bits (masked to width on
            /// read). Widths outside 1..=64 are rejected at construction.
            pub fn bits(layout: &Layout, bit_size: usize) -> Result<Self> {
                if bit_size == 0 || bit_size > 64 {
                    return Err(StruktError::invalid_parameter(
                        "bit_size",
                        "bitfield width must be 1..=64",
                    ));
                }
                Ok(Self {
                    member: Member::new(layout, 0, bit_size),
                })
            }

            pub fn get(&self) -> $ty {
                let bit_size = self.member.bit_size();
                if bit_size == $width && self.member.is_byte_aligned() {
                    self.member.$get()
                } else {
                    let mask = u64::MAX >> (64 - bit_size);
                    (self.member.read_raw() as u64 & mask) as $ty
                }
            }

            pub fn set(&self, value: $ty) {
                if self.member.bit_size() == $width && self.member.is_byte_aligned() {
                    self.member.$put(value);
                } else {
                    self.member.write_raw(value as i64);
                }
            }

            pub fn member(&self) -> &Member {
                &self.member
            }
        }
    };
}

signed_member!(
    /// An 8-bit signed integer.
    Signed8, i8, 1, 8, get_u8, put_u8
);
signed_member!(
    /// A 16-bit signed integer.
    Signed16, i16, 2, 16, get_u16, put_u16
);
signed_member!(
    /// A 32-bit signed integer.
    Signed32, i32, 4, 32, get_u32, put_u32
);
signed_member!(
    /// A 64-bit signed integer.
    Signed64, i64, 8, 64, get_u64, put_u64
);

unsigned_member!(
    /// An 8-bit unsigned integer.
    Unsigned8, u8, 1, 8, get_u8, put_u8
);
unsigned_member!(
    /// A 16-bit unsigned integer.
    Unsigned16, u16, 2, 16, get_u16, put_u16
);
unsigned_member!(
    /// A 32-bit unsigned integer.
    Unsigned32, u32, 4, 32, get_u32, put_u32
);

/// An arbitrary-width unsigned bitfield (1–63 bits) with no alignment
/// constraint; may cross byte and word boundaries.
#[derive(Debug, Clone)]
pub struct BitField {
    member: Member,
}

impl BitField {
    /// Widths of 64 or more do not fit an unsigned `u64` read through the
    /// signed codec and are rejected at construction.
    pub fn new(layout: &Layout, bit_size: usize) -> Result<Self> {
        if bit_size == 0 || bit_size >= 64 {
            return Err(StruktError::invalid_parameter(
                "bit_size",
                "unsigned bit fields must be 1 to 63 bits",
            ));
        }
        Ok(Self {
            member: Member::new(layout, 0, bit_size),
        })
    }

    pub fn get(&self) -> u64 {
        let mask = u64::MAX >> (64 - self.member.bit_size());
        self.member.read_raw() as u64 & mask
    }

    pub fn set(&self, value: u64) {
        self.member.write_raw(value as i64);
    }

    pub fn member(&self) -> &Member {
        &self.member
    }
}
