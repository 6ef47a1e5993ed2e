//! Struct/union layout engine.
//!
//! A [`Layout`] is the schema side of an overlay: an ordered set of member
//! reservations over a byte `Region`, built imperatively in declaration
//! order. Declaration order *is* the ABI layout. Construction computes every
//! member's bit offset under C alignment/packing/union rules; after
//! construction the schema is immutable and only the bound region and
//! position may change, so one layout can decode many buffer instances
//! (e.g. successive datagrams) without being rebuilt.
//!
//! `Layout` is a cheap clonable handle; member accessors hold one and
//! resolve the backing region through the root of the layout tree. It is not
//! `Send`: construction and access are single-threaded by type.

use std::cell::RefCell;
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::bits;
use crate::error::{Result, StruktError};
use crate::members::Utf8String;
use crate::region::{ByteOrder, Region};

/// Default process-wide maximum alignment in bytes
pub const DEFAULT_MAXIMUM_ALIGNMENT: usize = 4;

static MAXIMUM_ALIGNMENT: AtomicUsize = AtomicUsize::new(DEFAULT_MAXIMUM_ALIGNMENT);

/// Process-wide maximum alignment bound applied to every unpacked layout.
pub fn maximum_alignment() -> usize {
    MAXIMUM_ALIGNMENT.load(Ordering::Relaxed)
}

/// Set the process-wide maximum alignment (clamped to at least 1).
///
/// Affects layouts constructed after the call, not existing ones.
pub fn set_maximum_alignment(bytes: usize) {
    MAXIMUM_ALIGNMENT.store(bytes.max(1), Ordering::Relaxed);
}

/// Configuration for creating layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Union layouts place every direct member at bit offset 0
    pub union: bool,
    /// Packed layouts never insert alignment padding (alignment forced to 1)
    pub packed: bool,
    /// Byte order; authoritative at the root only, inner layouts delegate
    pub byte_order: ByteOrder,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            union: false,
            packed: false,
            byte_order: ByteOrder::BigEndian,
        }
    }
}

#[derive(Debug)]
struct LayoutCore {
    union: bool,
    packed: bool,
    byte_order: ByteOrder,
    /// Cursor resets before each direct member (unions outside array brackets)
    reset_index: bool,
    /// Bit cursor during construction
    bit_index: usize,
    /// High-water mark of the cursor, for size calculation
    bits_used: usize,
    /// Largest member alignment seen, clamped to the configured maximum
    alignment: usize,
    /// Owning layout, if adopted as an inner layout
    parent: Option<Rc<RefCell<LayoutCore>>>,
    /// Byte offset within the parent, or region position at the root
    outer_offset: usize,
    /// Bound region; root only, lazily allocated
    region: Option<Rc<RefCell<Region>>>,
}

impl LayoutCore {
    /// sizeof(this): bytes used, rounded up to a multiple of the alignment
    fn size(&self) -> usize {
        let bytes = (self.bits_used + 7) >> 3;
        if bytes % self.alignment == 0 {
            bytes // already aligned or packed
        } else {
            bytes + self.alignment - (bytes % self.alignment) // tail padding
        }
    }
}

/// A struct- or union-shaped schema over a byte region.
#[derive(Debug, Clone)]
pub struct Layout {
    core: Rc<RefCell<LayoutCore>>,
}

/// Anything that exposes a [`Layout`]; implemented by user wrapper structs
/// so they compose directly through [`Layout::inner`] and the array methods.
pub trait Overlay {
    fn layout(&self) -> &Layout;
}

impl Overlay for Layout {
    fn layout(&self) -> &Layout {
        self
    }
}

/// Non-owning handle to a layout, used by reference members for their
/// informational target cache.
#[derive(Debug, Clone)]
pub(crate) struct WeakLayout {
    core: Weak<RefCell<LayoutCore>>,
}

impl WeakLayout {
    pub(crate) fn upgrade(&self) -> Option<Layout> {
        self.core.upgrade().map(|core| Layout { core })
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Create an unpacked struct layout in network byte order.
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create an unpacked union layout in network byte order.
    pub fn union() -> Self {
        Self::with_config(LayoutConfig {
            union: true,
            ..LayoutConfig::default()
        })
    }

    /// Create a layout with explicit configuration.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            core: Rc::new(RefCell::new(LayoutCore {
                union: config.union,
                packed: config.packed,
                byte_order: config.byte_order,
                reset_index: config.union,
                bit_index: 0,
                bits_used: 0,
                alignment: 1,
                parent: None,
                outer_offset: 0,
                region: None,
            })),
        }
    }

    /// Reserve `bit_size` bits for a member and return its bit offset.
    ///
    /// `alignment` is the member's desired alignment in bytes, or 0 for a
    /// bitfield (no padding; bitfields may straddle byte boundaries). Member
    /// constructors call this; it is public so custom member types can too.
    pub fn reserve(&self, alignment: usize, bit_size: usize) -> usize {
        let max_alignment = maximum_alignment();
        let mut core = self.core.borrow_mut();

        // Union: every direct member overlaps at offset 0.
        if core.reset_index {
            core.bit_index = 0;
        }

        let mut bit_offset = core.bit_index;
        if alignment != 0 {
            // Not a bitfield: pad to the true alignment boundary.
            let clamped = alignment.min(max_alignment);
            if !core.packed && core.alignment < clamped {
                core.alignment = clamped;
            }
            let word_bits = if core.packed { 8 } else { clamped << 3 };
            let rem = bit_offset % word_bits;
            if rem != 0 {
                bit_offset += word_bits - rem;
            }
        }

        core.bit_index = bit_offset + bit_size;
        if core.bits_used < core.bit_index {
            core.bits_used = core.bit_index;
        }
        bit_offset
    }

    /// Size in bytes, including tail padding.
    pub fn size(&self) -> usize {
        self.core.borrow().size()
    }

    /// Alignment in bytes (largest member alignment, 1 if packed or empty).
    pub fn alignment(&self) -> usize {
        self.core.borrow().alignment
    }

    pub fn is_union(&self) -> bool {
        self.core.borrow().union
    }

    pub fn is_packed(&self) -> bool {
        self.core.borrow().packed
    }

    /// Bits reserved so far (before tail padding).
    pub fn bits_used(&self) -> usize {
        self.core.borrow().bits_used
    }

    /// Byte order, resolved through the root of the layout tree.
    pub fn byte_order(&self) -> ByteOrder {
        self.root_core().borrow().byte_order
    }

    /// Absolute byte position of this layout within the bound region.
    pub fn position(&self) -> usize {
        let mut position = 0;
        let mut cursor = self.core.clone();
        loop {
            let (offset, parent) = {
                let core = cursor.borrow();
                (core.outer_offset, core.parent.clone())
            };
            position += offset;
            match parent {
                Some(p) => cursor = p,
                None => return position,
            }
        }
    }

    fn root_core(&self) -> Rc<RefCell<LayoutCore>> {
        let mut cursor = self.core.clone();
        loop {
            let parent = cursor.borrow().parent.clone();
            match parent {
                Some(p) => cursor = p,
                None => return cursor,
            }
        }
    }

    pub(crate) fn downgrade(&self) -> WeakLayout {
        WeakLayout {
            core: Rc::downgrade(&self.core),
        }
    }

    /// The bound region, allocating an owned zeroed region of `size()`
    /// bytes in this layout's byte order on first access.
    pub fn region(&self) -> Rc<RefCell<Region>> {
        let root = self.root_core();
        let mut core = root.borrow_mut();
        let (size, order) = (core.size(), core.byte_order);
        core.region
            .get_or_insert_with(|| Rc::new(RefCell::new(Region::alloc(size, order))))
            .clone()
    }

    /// Bind this layout to `region` at byte `position`.
    ///
    /// Root layouts only; inner layouts inherit their parent's region. The
    /// region's byte order must match the layout's.
    pub fn set_region(&self, region: Region, position: usize) -> Result<()> {
        let mut core = self.core.borrow_mut();
        if core.parent.is_some() {
            return Err(StruktError::unsupported(
                "set_region",
                "inner layout region is inherited from its parent",
            ));
        }
        if region.order() != core.byte_order {
            return Err(StruktError::OrderMismatch {
                expected: core.byte_order,
                actual: region.order(),
            });
        }
        core.region = Some(Rc::new(RefCell::new(region)));
        core.outer_offset = position;
        Ok(())
    }

    /// Move this root layout to a new byte position within its region.
    pub fn set_position(&self, position: usize) -> Result<()> {
        let mut core = self.core.borrow_mut();
        if core.parent.is_some() {
            return Err(StruktError::unsupported(
                "set_position",
                "inner layout position is fixed by its parent",
            ));
        }
        core.outer_offset = position;
        Ok(())
    }

    fn check_bit_range(&self, bit_offset: usize, bit_size: usize) -> Result<()> {
        if bit_size == 0 || bit_size > 64 {
            return Err(StruktError::invalid_parameter(
                "bit_size",
                "bit size must be 1..=64",
            ));
        }
        let layout_size = self.size();
        if (bit_offset + bit_size - 1) >> 3 >= layout_size {
            return Err(StruktError::bounds(bit_offset, bit_size, layout_size));
        }
        if (bit_offset & 7) + bit_size > 64 {
            // Field would span 9 bytes; the 8-byte window cannot hold it.
            return Err(StruktError::invalid_parameter(
                "bit_size",
                "field does not fit an 8-byte window at this offset",
            ));
        }
        Ok(())
    }

    /// Read `bit_size` bits at the layout-relative `bit_offset`,
    /// sign-extended to an `i64`.
    pub fn read_bits(&self, bit_offset: usize, bit_size: usize) -> Result<i64> {
        self.check_bit_range(bit_offset, bit_size)?;
        let absolute = self.position() * 8 + bit_offset;
        let region = self.region();
        let value = bits::read_bits(&region.borrow(), absolute, bit_size);
        Ok(value)
    }

    /// Write the low `bit_size` bits of `value` at the layout-relative
    /// `bit_offset`.
    pub fn write_bits(&self, value: i64, bit_offset: usize, bit_size: usize) -> Result<()> {
        self.check_bit_range(bit_offset, bit_size)?;
        let absolute = self.position() * 8 + bit_offset;
        let region = self.region();
        bits::write_bits(&mut region.borrow_mut(), value, absolute, bit_size);
        Ok(())
    }

    /// Adopt `child` as an inner layout sharing this layout's region.
    ///
    /// Reserves `child.size() * 8` bits at the child's computed alignment
    /// and fixes the child's byte offset. A layout can be adopted by at
    /// most one parent; the child must be fully declared first, since its
    /// size is captured here.
    pub fn adopt(&self, child: &Layout) -> Result<()> {
        if Rc::ptr_eq(&self.core, &child.core) {
            return Err(StruktError::invalid_parameter(
                "child",
                "a layout cannot adopt itself",
            ));
        }
        {
            let child_core = child.core.borrow();
            if child_core.parent.is_some() {
                return Err(StruktError::invalid_parameter(
                    "child",
                    "already an inner layout",
                ));
            }
        }
        let (bit_size, alignment) = {
            let child_core = child.core.borrow();
            (child_core.size() * 8, child_core.alignment)
        };
        let bit_offset = self.reserve(alignment, bit_size);
        let mut child_core = child.core.borrow_mut();
        child_core.parent = Some(self.core.clone());
        child_core.outer_offset = bit_offset >> 3; // always byte aligned
        Ok(())
    }

    /// Adopt an overlay wrapper as an inner struct/union and hand it back.
    pub fn inner<T: Overlay>(&self, child: T) -> Result<T> {
        self.adopt(child.layout())?;
        Ok(child)
    }

    /// Start an array: within the bracket, a union lays elements out
    /// sequentially instead of resetting the cursor per element. Returns
    /// the saved reset flag for [`Self::end_array`].
    fn begin_array(&self) -> bool {
        let mut core = self.core.borrow_mut();
        let saved = core.reset_index;
        if saved {
            // The whole array starts at the union's reset offset; elements
            // within it stay sequential.
            core.bit_index = 0;
            core.reset_index = false;
        }
        saved
    }

    fn end_array(&self, saved: bool) {
        self.core.borrow_mut().reset_index = saved;
    }

    /// Adopt `len` inner layouts built by `factory` as a contiguous array.
    pub fn inner_array<T: Overlay>(
        &self,
        len: usize,
        mut factory: impl FnMut() -> T,
    ) -> Result<Vec<T>> {
        let saved = self.begin_array();
        let mut elements = Vec::with_capacity(len);
        for _ in 0..len {
            let element = factory();
            if let Err(e) = self.adopt(element.layout()) {
                self.end_array(saved);
                return Err(e);
            }
            elements.push(element);
        }
        self.end_array(saved);
        Ok(elements)
    }

    /// Two-dimensional inner array, row-major.
    pub fn inner_array_2d<T: Overlay>(
        &self,
        rows: usize,
        cols: usize,
        mut factory: impl FnMut() -> T,
    ) -> Result<Vec<Vec<T>>> {
        let saved = self.begin_array();
        let mut out = Vec::with_capacity(rows);
        for _ in 0..rows {
            match self.inner_array(cols, &mut factory) {
                Ok(row) => out.push(row),
                Err(e) => {
                    self.end_array(saved);
                    return Err(e);
                }
            }
        }
        self.end_array(saved);
        Ok(out)
    }

    /// Three-dimensional inner array.
    pub fn inner_array_3d<T: Overlay>(
        &self,
        dim0: usize,
        dim1: usize,
        dim2: usize,
        mut factory: impl FnMut() -> T,
    ) -> Result<Vec<Vec<Vec<T>>>> {
        let saved = self.begin_array();
        let mut out = Vec::with_capacity(dim0);
        for _ in 0..dim0 {
            match self.inner_array_2d(dim1, dim2, &mut factory) {
                Ok(plane) => out.push(plane),
                Err(e) => {
                    self.end_array(saved);
                    return Err(e);
                }
            }
        }
        self.end_array(saved);
        Ok(out)
    }

    /// Declare `len` members of one type as a contiguous array. The factory
    /// receives this layout and constructs each element in sequence.
    pub fn member_array<M>(&self, len: usize, mut factory: impl FnMut(&Layout) -> M) -> Vec<M> {
        let saved = self.begin_array();
        let members = (0..len).map(|_| factory(self)).collect();
        self.end_array(saved);
        members
    }

    /// [`Self::member_array`] for fallible member constructors
    /// (e.g. [`crate::members::BitField`]).
    pub fn try_member_array<M>(
        &self,
        len: usize,
        mut factory: impl FnMut(&Layout) -> Result<M>,
    ) -> Result<Vec<M>> {
        let saved = self.begin_array();
        let mut members = Vec::with_capacity(len);
        for _ in 0..len {
            match factory(self) {
                Ok(m) => members.push(m),
                Err(e) => {
                    self.end_array(saved);
                    return Err(e);
                }
            }
        }
        self.end_array(saved);
        Ok(members)
    }

    /// Declare `len` null-terminated strings of `string_length` bytes each.
    pub fn string_array(&self, len: usize, string_length: usize) -> Vec<Utf8String> {
        self.member_array(len, |layout| Utf8String::new(layout, string_length))
    }

    /// Read up to `size()` bytes from `input` into the layout's bytes at
    /// its current position, returning the count actually read (short only
    /// at EOF). Holds the region borrow for the whole transfer.
    pub fn read_from<R: Read>(&self, input: &mut R) -> Result<usize> {
        let size = self.size();
        let position = self.position();
        let region = self.region();
        let mut reg = region.borrow_mut();
        let available = reg.len();
        let bytes = reg
            .as_mut_slice()
            .get_mut(position..position + size)
            .ok_or(StruktError::InsufficientSpace {
                requested: position + size,
                available,
            })?;
        let mut total = 0;
        while total < size {
            match input.read(&mut bytes[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StruktError::from_io(e, "Failed to read layout bytes")),
            }
        }
        Ok(total)
    }

    /// Write exactly `size()` bytes at the layout's current position to
    /// `out`. Holds the region borrow for the whole transfer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let size = self.size();
        let position = self.position();
        let region = self.region();
        let reg = region.borrow();
        let bytes = reg
            .as_slice()
            .get(position..position + size)
            .ok_or(StruktError::InsufficientSpace {
                requested: position + size,
                available: reg.len(),
            })?;
        out.write_all(bytes)
            .map_err(|e| StruktError::from_io(e, "Failed to write layout bytes"))
    }

    /// Native address of this layout, for regions that expose one.
    ///
    /// Lets layouts be targeted by reference members. Owned regions have no
    /// stable native address and return `Unsupported`.
    pub fn address(&self) -> Result<usize> {
        let region = self.region();
        let base = region.borrow().native_address();
        match base {
            Some(base) => Ok(base + self.position()),
            None => Err(StruktError::unsupported(
                "address",
                "region does not expose a native address",
            )),
        }
    }
}

/// Hex dump of the layout's bytes: uppercase pairs, 16 per line, a
/// separator after every byte.
impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        let position = self.position();
        let region = self.region();
        let reg = region.borrow();
        for i in 0..size {
            let sep = if i & 0xF == 0xF { '\n' } else { ' ' };
            write!(f, "{:02X}{}", reg.get_u8(position + i), sep)?;
        }
        Ok(())
    }
}
