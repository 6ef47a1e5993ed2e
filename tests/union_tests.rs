//! Integration tests for union layouts

use strukt::members::{Unsigned16, Unsigned32, Unsigned8};
use strukt::{ByteOrder, Layout, LayoutConfig, Overlay};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_members_overlap_at_offset_zero() {
        let layout = Layout::union();
        let a = Unsigned8::new(&layout);
        let b = Unsigned16::new(&layout);
        let c = Unsigned32::new(&layout);

        assert_eq!(a.member().bit_offset(), 0);
        assert_eq!(b.member().bit_offset(), 0);
        assert_eq!(c.member().bit_offset(), 0);
        assert_eq!(layout.size(), 4); // max extent, tail padded
        assert_eq!(layout.alignment(), 4);
    }

    #[test]
    fn test_overlapping_writes_share_bytes_big_endian() {
        let layout = Layout::union();
        let a = Unsigned8::new(&layout);
        let b = Unsigned16::new(&layout);

        b.set(0x1234);
        // Big-endian: byte 0 holds the high byte of b.
        assert_eq!(a.get(), 0x12);

        a.set(0xFF);
        assert_eq!(b.get(), 0xFF34);
    }

    #[test]
    fn test_overlapping_writes_share_bytes_little_endian() {
        let layout = Layout::with_config(LayoutConfig {
            union: true,
            byte_order: ByteOrder::LittleEndian,
            ..LayoutConfig::default()
        });
        let a = Unsigned8::new(&layout);
        let b = Unsigned16::new(&layout);

        b.set(0x1234);
        // Little-endian: byte 0 holds the low byte of b.
        assert_eq!(a.get(), 0x34);
    }

    #[test]
    fn test_member_array_in_union_is_sequential() {
        let layout = Layout::union();
        let whole = Unsigned32::new(&layout);
        let bytes = layout.member_array(4, Unsigned8::new);

        // The array as a whole starts at the union's reset offset, but its
        // elements remain sequential relative to each other.
        assert_eq!(bytes[0].member().bit_offset(), 0);
        assert_eq!(bytes[1].member().bit_offset(), 8);
        assert_eq!(bytes[3].member().bit_offset(), 24);
        assert_eq!(layout.size(), 4);

        whole.set(0xAABBCCDD);
        assert_eq!(bytes[0].get(), 0xAA);
        assert_eq!(bytes[3].get(), 0xDD);

        // The next direct member still resets to offset 0.
        let after = Unsigned8::new(&layout);
        assert_eq!(after.member().bit_offset(), 0);
    }

    #[test]
    fn test_inner_struct_array_in_union() {
        struct Pair {
            hi: Unsigned8,
            lo: Unsigned8,
            layout: Layout,
        }
        impl Pair {
            fn new() -> Self {
                let layout = Layout::new();
                Self {
                    hi: Unsigned8::new(&layout),
                    lo: Unsigned8::new(&layout),
                    layout,
                }
            }
        }
        impl Overlay for Pair {
            fn layout(&self) -> &Layout {
                &self.layout
            }
        }

        let layout = Layout::union();
        let word = Unsigned32::new(&layout);
        let pairs = layout.inner_array(2, Pair::new).unwrap();

        assert_eq!(pairs[0].layout().position(), 0);
        assert_eq!(pairs[1].layout().position(), 2);
        assert_eq!(layout.size(), 4);

        word.set(0x11223344);
        assert_eq!(pairs[0].hi.get(), 0x11);
        assert_eq!(pairs[1].lo.get(), 0x44);
    }

    #[test]
    fn test_union_of_bitfields() {
        let layout = Layout::union();
        let nibble = Unsigned8::bits(&layout, 4).unwrap();
        let byte = Unsigned8::new(&layout);

        byte.set(0xC3);
        // Big-endian bitfields are leftmost-first: the 4-bit view reads the
        // high nibble.
        assert_eq!(nibble.get(), 0xC);
    }
}
