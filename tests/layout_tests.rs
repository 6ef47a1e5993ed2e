//! Integration tests for layout construction, binding and stream adapters

use strukt::members::{Float32, Unsigned16, Unsigned8, Utf8String};
use strukt::{ByteOrder, Layout, LayoutConfig, Overlay, Region, StruktError};

struct Date {
    year: Unsigned16,
    month: Unsigned8,
    day: Unsigned8,
    layout: Layout,
}

impl Date {
    fn new() -> Self {
        let layout = Layout::new();
        Self {
            year: Unsigned16::new(&layout),
            month: Unsigned8::new(&layout),
            day: Unsigned8::new(&layout),
            layout,
        }
    }
}

impl Overlay for Date {
    fn layout(&self) -> &Layout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_date_layout_and_serialized_bytes() {
        let date = Date::new();
        assert_eq!(date.layout.size(), 4);
        assert_eq!(date.layout.alignment(), 2);
        assert_eq!(date.year.member().bit_offset(), 0);
        assert_eq!(date.month.member().bit_offset(), 16);
        assert_eq!(date.day.member().bit_offset(), 24);

        date.year.set(2024);
        date.month.set(3);
        date.day.set(7);

        let region = date.layout.region();
        assert_eq!(region.borrow().as_slice(), &[0x07, 0xE8, 0x03, 0x07]);
    }

    #[test]
    fn test_hex_dump_and_reparse() {
        let date = Date::new();
        date.year.set(2024);
        date.month.set(3);
        date.day.set(7);

        let dump = format!("{}", date.layout);
        assert_eq!(dump, "07 E8 03 07 ");

        let parsed: Vec<u8> = dump
            .split_whitespace()
            .map(|pair| u8::from_str_radix(pair, 16).unwrap())
            .collect();
        let region = date.layout.region();
        assert_eq!(parsed, region.borrow().as_slice());
    }

    #[test]
    fn test_hex_dump_wraps_every_16_bytes() {
        let layout = Layout::new();
        let _bytes = layout.member_array(17, Unsigned8::new);
        let dump = format!("{}", layout);
        let lines: Vec<&str> = dump.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split_whitespace().count(), 16);
        assert_eq!(lines[1].split_whitespace().count(), 1);
    }

    #[test]
    fn test_rebinding_decodes_successive_buffers() {
        // One schema object decoding two datagrams in turn.
        let date = Date::new();
        date.layout
            .set_region(
                Region::from_vec(vec![0x07, 0xE8, 0x03, 0x07], ByteOrder::BigEndian),
                0,
            )
            .unwrap();
        assert_eq!(date.year.get(), 2024);
        assert_eq!(date.day.get(), 7);

        date.layout
            .set_region(
                Region::from_vec(vec![0x07, 0xD3, 0x0C, 0x1F], ByteOrder::BigEndian),
                0,
            )
            .unwrap();
        assert_eq!(date.year.get(), 2003);
        assert_eq!(date.month.get(), 12);
        assert_eq!(date.day.get(), 31);
    }

    #[test]
    fn test_rebinding_position_within_one_buffer() {
        let date = Date::new();
        let mut bytes = vec![0u8; 8];
        bytes[4..8].copy_from_slice(&[0x07, 0xE8, 0x03, 0x07]);
        date.layout
            .set_region(Region::from_vec(bytes, ByteOrder::BigEndian), 4)
            .unwrap();
        assert_eq!(date.year.get(), 2024);

        date.layout.set_position(0).unwrap();
        assert_eq!(date.year.get(), 0);
    }

    #[test]
    fn test_stream_round_trip() {
        let out_date = Date::new();
        out_date.year.set(2024);
        out_date.month.set(3);
        out_date.day.set(7);

        let mut encoded = Vec::new();
        out_date.layout.write_to(&mut encoded).unwrap();
        assert_eq!(encoded, vec![0x07, 0xE8, 0x03, 0x07]);

        let in_date = Date::new();
        let read = in_date.layout.read_from(&mut Cursor::new(encoded)).unwrap();
        assert_eq!(read, 4);
        assert_eq!(in_date.year.get(), 2024);
        assert_eq!(in_date.month.get(), 3);
        assert_eq!(in_date.day.get(), 7);
    }

    #[test]
    fn test_read_from_short_stream() {
        let date = Date::new();
        let read = date
            .layout
            .read_from(&mut Cursor::new(vec![0x07, 0xE8]))
            .unwrap();
        assert_eq!(read, 2);
        assert_eq!(date.year.get(), 2024);
        assert_eq!(date.day.get(), 0);
    }

    #[test]
    fn test_address_unsupported_for_owned_region() {
        let date = Date::new();
        assert!(matches!(
            date.layout.address(),
            Err(StruktError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_nested_struct_shares_parent_region() {
        // struct Student { char name[12]; struct Date birth; float grade; };
        struct Student {
            name: Utf8String,
            birth: Date,
            grade: Float32,
            layout: Layout,
        }
        let layout = Layout::new();
        let student = Student {
            name: Utf8String::new(&layout, 12),
            birth: layout.inner(Date::new()).unwrap(),
            grade: Float32::new(&layout),
            layout,
        };

        assert_eq!(student.birth.layout().position(), 12);
        assert_eq!(student.grade.member().bit_offset(), 16 * 8);
        assert_eq!(student.layout.size(), 20);

        student.name.set("John Doe");
        student.birth.year.set(2003);
        student.grade.set(12.5);

        let region = student.layout.region();
        let reg = region.borrow();
        assert_eq!(&reg.as_slice()[..8], b"John Doe");
        assert_eq!(reg.as_slice()[12..14], [0x07, 0xD3]);
        assert_eq!(student.birth.year.get(), 2003);
    }

    #[test]
    fn test_inner_arrays_are_contiguous() {
        let layout = Layout::new();
        let grid = layout.inner_array_2d(2, 3, Date::new).unwrap();
        assert_eq!(layout.size(), 24);
        assert_eq!(grid[0][0].layout().position(), 0);
        assert_eq!(grid[0][2].layout().position(), 8);
        assert_eq!(grid[1][0].layout().position(), 12);

        grid[1][2].year.set(1999);
        let region = layout.region();
        assert_eq!(region.borrow().as_slice()[20..22], [0x07, 0xCF]);
    }

    #[test]
    fn test_string_array() {
        let layout = Layout::new();
        let names = layout.string_array(3, 8);
        assert_eq!(layout.size(), 24);
        names[1].set("abc");
        assert_eq!(names[0].get(), "");
        assert_eq!(names[1].get(), "abc");
        assert_eq!(names[1].member().bit_offset(), 64);
    }

    #[test]
    fn test_little_endian_layout() {
        let layout = Layout::with_config(LayoutConfig {
            byte_order: ByteOrder::LittleEndian,
            ..LayoutConfig::default()
        });
        let value = Unsigned16::new(&layout);
        value.set(0x1234);
        let region = layout.region();
        assert_eq!(region.borrow().as_slice(), &[0x34, 0x12]);
    }

    #[test]
    fn test_byte_order_inherited_by_inner_layouts() {
        let parent = Layout::with_config(LayoutConfig {
            byte_order: ByteOrder::LittleEndian,
            ..LayoutConfig::default()
        });
        let child = Layout::new(); // nominally big-endian
        let value = Unsigned16::new(&child);
        parent.adopt(&child).unwrap();
        assert_eq!(child.byte_order(), ByteOrder::LittleEndian);

        value.set(0x1234);
        let region = parent.region();
        assert_eq!(region.borrow().as_slice(), &[0x34, 0x12]);
    }

    #[test]
    fn test_short_region_accommodation() {
        // Region shorter than the layout: reads past its end are zero,
        // writes past it are dropped, nothing faults.
        let date = Date::new();
        date.layout
            .set_region(Region::from_vec(vec![0x07, 0xE8, 0x03], ByteOrder::BigEndian), 0)
            .unwrap();
        assert_eq!(date.year.get(), 2024);
        assert_eq!(date.day.get(), 0);
        date.day.set(9); // silently dropped
        assert_eq!(date.day.get(), 0);
        assert_eq!(date.month.get(), 3);
    }
}
