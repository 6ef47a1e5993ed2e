//! Address reference members (C pointers to other overlays).
//!
//! The stored bytes are authoritative; the cached target handle is
//! informational and weak. `get` never re-derives a layout from the stored
//! address — callers detect staleness with `is_up_to_date` and re-resolve
//! themselves.

use std::cell::RefCell;

use super::Member;
use crate::error::Result;
use crate::layout::{Layout, Overlay, WeakLayout};

macro_rules! reference_member {
    ($(#[$doc:meta])* $name:ident, $align:expr, $width:expr, $raw:ty, $get:ident, $put:ident) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            member: Member,
            target: RefCell<Option<WeakLayout>>,
        }

        impl $name {
            pub fn new(layout: &Layout) -> Self {
                Self {
                    member: Member::new(layout, $align, $width),
                    target: RefCell::new(None),
                }
            }

            /// Store `target`'s native address (0 for `None`) and cache the
            /// target. Fails if the target's region exposes no address.
            pub fn set<T: Overlay>(&self, target: Option<&T>) -> Result<()> {
                let address: $raw = match target {
                    Some(t) => t.layout().address()? as $raw,
                    None => 0,
                };
                self.member.$put(address);
                *self.target.borrow_mut() =
                    target.map(|t| t.layout().downgrade());
                Ok(())
            }

            /// The cached target, if still alive. Never derived from the
            /// stored address.
            pub fn get(&self) -> Option<Layout> {
                self.target.borrow().as_ref().and_then(WeakLayout::upgrade)
            }

            /// The raw stored address bytes.
            pub fn value(&self) -> $raw {
                self.member.$get()
            }

            /// Whether the stored address still matches the cached target's
            /// current address (or zero when no target is cached). Staleness
            /// detection only; the caller must re-resolve.
            pub fn is_up_to_date(&self) -> bool {
                let stored = self.value();
                match self.get() {
                    Some(target) => match target.address() {
                        Ok(address) => stored == address as $raw,
                        Err(_) => false,
                    },
                    None => stored == 0,
                }
            }

            pub fn member(&self) -> &Member {
                &self.member
            }
        }
    };
}

reference_member!(
    /// A 32-bit reference (pointer) to another overlay.
    Reference32, 4, 32, u32, get_u32, put_u32
);
reference_member!(
    /// A 64-bit reference (pointer) to another overlay.
    Reference64, 8, 64, u64, get_u64, put_u64
);
