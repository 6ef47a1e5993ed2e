//! Fixed-length, null-terminated string members (C `char name[N]`).

use std::fmt;

use super::Member;
use crate::layout::Layout;

/// A UTF-8 string of at most `length` bytes, null-terminated when shorter.
///
/// `set` truncates at a character boundary if the string is longer than the
/// field and writes the content plus a terminator if shorter. Bytes past
/// the terminator are left untouched, so a shorter write does not clear
/// trailing bytes from a longer previous value.
#[derive(Debug, Clone)]
pub struct Utf8String {
    member: Member,
    length: usize,
}

impl Utf8String {
    pub fn new(layout: &Layout, length: usize) -> Self {
        Self {
            member: Member::new(layout, 1, length * 8),
            length,
        }
    }

    /// Field length in bytes (including room for the terminator).
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set(&self, value: &str) {
        let bytes = value.as_bytes();
        let region = self.member.layout().region();
        let mut reg = region.borrow_mut();
        let index = self.member.byte_index();
        if bytes.len() < self.length {
            reg.store(index, bytes);
            reg.put_u8(index + bytes.len(), 0); // marks end of string
        } else {
            let mut end = self.length;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            reg.store(index, &bytes[..end]);
            if end < self.length {
                reg.put_u8(index + end, 0);
            }
        }
    }

    pub fn get(&self) -> String {
        let region = self.member.layout().region();
        let reg = region.borrow();
        let index = self.member.byte_index();
        let mut content = Vec::with_capacity(self.length);
        for i in 0..self.length {
            let byte = reg.get_u8(index + i);
            if byte == 0 {
                break; // null terminator
            }
            content.push(byte);
        }
        String::from_utf8_lossy(&content).into_owned()
    }

    pub fn member(&self) -> &Member {
        &self.member
    }
}

impl fmt::Display for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get())
    }
}
