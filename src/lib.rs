//! # strukt - Declarative C-Compatible Memory Overlays
//!
//! strukt describes the field-by-field layout of a native (C/C++-ABI-style)
//! data structure in plain Rust code and reads/writes those fields directly
//! against a raw byte buffer - with C alignment, tail padding, bit-packing
//! and byte-order semantics, and without a separate schema compiler.
//!
//! Declaration order defines the layout, exactly like a C struct body:
//!
//! ```
//! use strukt::{Layout, Overlay};
//! use strukt::members::{Unsigned16, Unsigned8};
//!
//! // struct Date { unsigned short year; unsigned char month, day; };
//! struct Date {
//!     year: Unsigned16,
//!     month: Unsigned8,
//!     day: Unsigned8,
//!     layout: Layout,
//! }
//!
//! impl Date {
//!     fn new() -> Self {
//!         let layout = Layout::new(); // big-endian, unpacked
//!         Self {
//!             year: Unsigned16::new(&layout),
//!             month: Unsigned8::new(&layout),
//!             day: Unsigned8::new(&layout),
//!             layout,
//!         }
//!     }
//! }
//!
//! impl Overlay for Date {
//!     fn layout(&self) -> &Layout {
//!         &self.layout
//!     }
//! }
//!
//! let date = Date::new();
//! assert_eq!(date.layout.size(), 4); // u16 + 2 * u8, aligned to 2
//! date.year.set(2024);
//! date.month.set(3);
//! date.day.set(7);
//! assert_eq!(date.year.get(), 2024);
//! ```
//!
//! A layout is built once and can then be bound to many regions or
//! positions in turn (memory-mapped storage, successive datagram buffers),
//! so one schema object decodes any number of buffer instances. Unions,
//! packed layouts, bitfields that straddle byte boundaries, nested structs
//! and arrays, enumerations and address references are all part of the
//! member catalogue.

pub mod error;
pub mod layout;
pub mod members;
pub mod region;

mod bits;

// Main API re-exports
pub use error::{Result, StruktError};
pub use layout::{
    maximum_alignment, set_maximum_alignment, Layout, LayoutConfig, Overlay,
    DEFAULT_MAXIMUM_ALIGNMENT,
};
pub use members::{
    BitField, Bool, Enum16, Enum32, Enum64, Enum8, Float32, Float64, Member, Ordinal, Reference32,
    Reference64, Signed16, Signed32, Signed64, Signed8, Unsigned16, Unsigned32, Unsigned8,
    Utf8String,
};
pub use region::{ByteOrder, Region};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
