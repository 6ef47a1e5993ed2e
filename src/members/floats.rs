//! IEEE-754 float members. Fixed width only; no bitfield variant.

use super::Member;
use crate::layout::Layout;

/// A 32-bit IEEE-754 float.
#[derive(Debug, Clone)]
pub struct Float32 {
    member: Member,
}

impl Float32 {
    pub fn new(layout: &Layout) -> Self {
        Self {
            member: Member::new(layout, 4, 32),
        }
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.member.get_u32())
    }

    pub fn set(&self, value: f32) {
        self.member.put_u32(value.to_bits());
    }

    pub fn member(&self) -> &Member {
        &self.member
    }
}

/// A 64-bit IEEE-754 float.
#[derive(Debug, Clone)]
pub struct Float64 {
    member: Member,
}

impl Float64 {
    pub fn new(layout: &Layout) -> Self {
        Self {
            member: Member::new(layout, 8, 64),
        }
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.member.get_u64())
    }

    pub fn set(&self, value: f64) {
        self.member.put_u64(value.to_bits());
    }

    pub fn member(&self) -> &Member {
        &self.member
    }
}
