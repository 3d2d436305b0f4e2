/*!
 * Property Tests
 */

use ai_os_buffer::codec::{base64, is_utf8};
use ai_os_buffer::{BufferView, Encoding};
use proptest::prelude::*;
use std::cmp::Ordering;

proptest! {
    #[test]
    fn prop_uint32_round_trip(value in any::<u32>(), offset in 0usize..5) {
        let buf = BufferView::alloc(9).unwrap();
        prop_assert_eq!(buf.write_uint32_be(value, offset).unwrap(), offset + 4);
        prop_assert_eq!(buf.read_uint32_be(offset).unwrap(), value);
    }

    #[test]
    fn prop_int48_round_trip(value in -(1i64 << 47)..(1i64 << 47)) {
        let buf = BufferView::alloc(6).unwrap();
        buf.write_int_le(value as f64, 0, 6).unwrap();
        prop_assert_eq!(buf.read_int_le(0, 6).unwrap(), value);
    }

    #[test]
    fn prop_endian_mirror(value in any::<u32>()) {
        let be = BufferView::alloc(4).unwrap();
        let le = BufferView::alloc(4).unwrap();
        be.write_uint32_be(value, 0).unwrap();
        le.write_uint32_le(value, 0).unwrap();
        let mut reversed = be.to_vec();
        reversed.reverse();
        prop_assert_eq!(reversed, le.to_vec());
    }

    #[test]
    fn prop_double_round_trip(value in any::<f64>().prop_filter("NaN", |v| !v.is_nan())) {
        let buf = BufferView::alloc(8).unwrap();
        buf.write_double_be(value, 0).unwrap();
        prop_assert_eq!(buf.read_double_be(0).unwrap().to_bits(), value.to_bits());
    }

    #[test]
    fn prop_is_utf8_matches_std(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(is_utf8(&bytes), std::str::from_utf8(&bytes).is_ok());
    }

    #[test]
    fn prop_base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
        prop_assert_eq!(base64::decode(&base64::encode(&bytes)), bytes.clone());
        prop_assert_eq!(base64::decode(&base64::encode_url(&bytes)), bytes);
    }

    #[test]
    fn prop_hex_decode_of_encode(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let buf = BufferView::from_bytes(&bytes).unwrap();
        let text = buf.decode(Encoding::Hex);
        prop_assert_eq!(BufferView::from_string(&text, Encoding::Hex).unwrap().to_vec(), bytes);
    }

    #[test]
    fn prop_byte_length_utf8(s in ".{0,32}") {
        prop_assert_eq!(BufferView::byte_length(&s, Encoding::Utf8), s.len());
    }

    #[test]
    fn prop_compare_antisymmetric(
        a in proptest::collection::vec(any::<u8>(), 0..8),
        b in proptest::collection::vec(any::<u8>(), 0..8),
    ) {
        let x = BufferView::from_bytes(&a).unwrap();
        let y = BufferView::from_bytes(&b).unwrap();
        prop_assert_eq!(BufferView::compare(&x, &y), BufferView::compare(&y, &x).reverse());
        prop_assert_eq!(BufferView::compare(&x, &y) == Ordering::Equal, x.equals(&y));
        prop_assert_eq!(BufferView::compare(&x, &y), a.cmp(&b));
    }
}

/// LE bytes are the BE bytes reversed
fn mirrored(be: &BufferView, le: &BufferView) -> bool {
    let mut reversed = be.to_vec();
    reversed.reverse();
    reversed == le.to_vec()
}

macro_rules! fixed_width_round_trip {
    ($name:ident, $ty:ty, $width:expr, $write_be:ident, $write_le:ident, $read_be:ident, $read_le:ident) => {
        proptest! {
            #[test]
            fn $name(value in any::<$ty>(), offset in 0usize..4) {
                let be = BufferView::alloc(offset + $width).unwrap();
                let le = BufferView::alloc(offset + $width).unwrap();
                prop_assert_eq!(be.$write_be(value, offset).unwrap(), offset + $width);
                prop_assert_eq!(le.$write_le(value, offset).unwrap(), offset + $width);
                prop_assert_eq!(be.$read_be(offset).unwrap(), value);
                prop_assert_eq!(le.$read_le(offset).unwrap(), value);
                prop_assert!(mirrored(
                    &be.slice_from(offset as isize),
                    &le.slice_from(offset as isize)
                ));
            }
        }
    };
}

fixed_width_round_trip!(prop_uint16_both_orders, u16, 2, write_uint16_be, write_uint16_le, read_uint16_be, read_uint16_le);
fixed_width_round_trip!(prop_int16_both_orders, i16, 2, write_int16_be, write_int16_le, read_int16_be, read_int16_le);
fixed_width_round_trip!(prop_uint32_both_orders, u32, 4, write_uint32_be, write_uint32_le, read_uint32_be, read_uint32_le);
fixed_width_round_trip!(prop_int32_both_orders, i32, 4, write_int32_be, write_int32_le, read_int32_be, read_int32_le);
fixed_width_round_trip!(prop_big_uint64_both_orders, u64, 8, write_big_uint64_be, write_big_uint64_le, read_big_uint64_be, read_big_uint64_le);
fixed_width_round_trip!(prop_big_int64_both_orders, i64, 8, write_big_int64_be, write_big_int64_le, read_big_int64_be, read_big_int64_le);

proptest! {
    #[test]
    fn prop_uint8_and_int8(unsigned in any::<u8>(), signed in any::<i8>()) {
        let buf = BufferView::alloc(2).unwrap();
        prop_assert_eq!(buf.write_uint8(unsigned, 0).unwrap(), 1);
        prop_assert_eq!(buf.write_int8(signed, 1).unwrap(), 2);
        prop_assert_eq!(buf.read_uint8(0).unwrap(), unsigned);
        prop_assert_eq!(buf.read_int8(1).unwrap(), signed);
        prop_assert_eq!(buf.read_uint8(1).unwrap(), signed as u8);
    }

    #[test]
    fn prop_variable_width_unsigned(width in 1usize..=6, raw in any::<u64>()) {
        let value = raw & ((1u64 << (8 * width)) - 1);
        let be = BufferView::alloc(width).unwrap();
        let le = BufferView::alloc(width).unwrap();
        prop_assert_eq!(be.write_uint_be(value as f64, 0usize, width).unwrap(), width);
        prop_assert_eq!(le.write_uint_le(value as f64, 0usize, width).unwrap(), width);
        prop_assert_eq!(be.read_uint_be(0usize, width).unwrap(), value);
        prop_assert_eq!(le.read_uint_le(0usize, width).unwrap(), value);
        prop_assert!(mirrored(&be, &le));
    }

    #[test]
    fn prop_variable_width_signed(width in 1usize..=6, raw in any::<u64>()) {
        let shift = 64 - 8 * width as u32;
        let value = ((raw << shift) as i64) >> shift;
        let be = BufferView::alloc(width).unwrap();
        let le = BufferView::alloc(width).unwrap();
        prop_assert_eq!(be.write_int_be(value as f64, 0usize, width).unwrap(), width);
        prop_assert_eq!(le.write_int_le(value as f64, 0usize, width).unwrap(), width);
        prop_assert_eq!(be.read_int_be(0usize, width).unwrap(), value);
        prop_assert_eq!(le.read_int_le(0usize, width).unwrap(), value);
        prop_assert!(mirrored(&be, &le));
    }

    #[test]
    fn prop_float_both_orders(bits in any::<u32>()) {
        let value = f32::from_bits(bits);
        let be = BufferView::alloc(4).unwrap();
        let le = BufferView::alloc(4).unwrap();
        be.write_float_be(value, 0usize).unwrap();
        le.write_float_le(value, 0usize).unwrap();
        let (from_be, from_le) = (be.read_float_be(0usize).unwrap(), le.read_float_le(0usize).unwrap());
        if value.is_nan() {
            prop_assert!(from_be.is_nan() && from_le.is_nan());
        } else {
            prop_assert_eq!(from_be.to_bits(), bits);
            prop_assert_eq!(from_le.to_bits(), bits);
        }
        prop_assert!(mirrored(&be, &le));
    }

    #[test]
    fn prop_double_both_orders(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        let be = BufferView::alloc(8).unwrap();
        let le = BufferView::alloc(8).unwrap();
        be.write_double_be(value, 0usize).unwrap();
        le.write_double_le(value, 0usize).unwrap();
        prop_assert_eq!(be.read_double_be(0usize).unwrap().to_bits(), bits);
        prop_assert_eq!(le.read_double_le(0usize).unwrap().to_bits(), bits);
        prop_assert!(mirrored(&be, &le));
    }
}

#[test]
fn test_float_special_values_are_bit_exact() {
    let buf = BufferView::alloc(4).unwrap();
    let cases: [(f32, [u8; 4]); 4] = [
        (f32::INFINITY, [0x7F, 0x80, 0x00, 0x00]),
        (f32::NEG_INFINITY, [0xFF, 0x80, 0x00, 0x00]),
        (-0.0, [0x80, 0x00, 0x00, 0x00]),
        (f32::NAN, [0x7F, 0xC0, 0x00, 0x00]),
    ];
    for (value, expected) in cases {
        buf.write_float_be(value, 0usize).unwrap();
        assert_eq!(buf.to_vec(), expected.to_vec());
        buf.write_float_le(value, 0usize).unwrap();
        let mut reversed = expected.to_vec();
        reversed.reverse();
        assert_eq!(buf.to_vec(), reversed);
    }
    buf.write_float_le(-0.0f32, 0usize).unwrap();
    assert!(buf.read_float_le(0usize).unwrap().is_sign_negative());
}
