//! Enumeration members backed by a closed ordinal mapping.
//!
//! Instead of an external ordered list of permitted values, the mapping
//! between a variant and its serialized ordinal is fixed at compile time by
//! the [`Ordinal`] trait. `get` rejects stored values with no variant;
//! `set` rejects ordinals wider than the field.

use std::marker::PhantomData;

use super::Member;
use crate::error::{Result, StruktError};
use crate::layout::Layout;

/// Bidirectional mapping between an enum variant and its serialized ordinal.
///
/// `from_ordinal(v.ordinal())` must return `Some(v)` for every variant.
pub trait Ordinal: Copy {
    fn ordinal(self) -> u64;
    fn from_ordinal(ordinal: u64) -> Option<Self>;
}

macro_rules! enum_member {
    ($(#[$doc:meta])* $name:ident, $width:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<T: Ordinal> {
            member: Member,
            variants: PhantomData<T>,
        }

        impl<T: Ordinal> $name<T> {
            pub fn new(layout: &Layout) -> Self {
                Self {
                    member: Member::new(layout, 1, $width),
                    variants: PhantomData,
                }
            }

            /// Declare as a bitfield of `bit_size` bits. Widths outside
            /// 1..=64 are rejected at construction.
            pub fn bits(layout: &Layout, bit_size: usize) -> Result<Self> {
                if bit_size == 0 || bit_size > 64 {
                    return Err(StruktError::invalid_parameter(
                        "bit_size",
                        "bitfield width must be 1..=64",
                    ));
                }
                Ok(Self {
                    member: Member::new(layout, 0, bit_size),
                    variants: PhantomData,
                })
            }

            pub fn get(&self) -> Result<T> {
                let bit_size = self.member.bit_size();
                let mask = u64::MAX >> (64 - bit_size);
                let ordinal = self.member.read_raw() as u64 & mask;
                T::from_ordinal(ordinal).ok_or(StruktError::UnknownOrdinal { ordinal, bit_size })
            }

            pub fn set(&self, value: T) -> Result<()> {
                let ordinal = value.ordinal();
                let bit_size = self.member.bit_size();
                if bit_size < 64 && ordinal >> bit_size != 0 {
                    return Err(StruktError::invalid_parameter(
                        "value",
                        format!("ordinal {} does not fit {} bits", ordinal, bit_size),
                    ));
                }
                self.member.write_raw(ordinal as i64);
                Ok(())
            }

            pub fn member(&self) -> &Member {
                &self.member
            }
        }
    };
}

enum_member!(
    /// An 8-bit enumeration.
    Enum8, 8
);
enum_member!(
    /// A 16-bit enumeration.
    Enum16, 16
);
enum_member!(
    /// A 32-bit enumeration.
    Enum32, 32
);
enum_member!(
    /// A 64-bit enumeration.
    Enum64, 64
);
