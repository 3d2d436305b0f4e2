/*!
 * Numeric Codec Tests
 * Fixed-width reads/writes, domain checks, bounds and value conversion
 */

use ai_os_buffer::{BufferView, JsObject, JsValue};
use pretty_assertions::assert_eq;

fn zeroed(len: usize) -> BufferView {
    BufferView::alloc(len).unwrap()
}

#[test]
fn test_uint16_be_scenario() {
    let buf = zeroed(2);
    assert_eq!(buf.write_uint16_be(0x1234, 0).unwrap(), 2);
    assert_eq!(buf.to_vec(), vec![0x12, 0x34]);
    assert_eq!(buf.read_uint16_be(0).unwrap(), 0x1234);
    assert_eq!(buf.read_uint16_le(0).unwrap(), 0x3412);
}

#[test]
fn test_chained_writes() {
    let buf = zeroed(7);
    let mut offset = buf.write_uint8(1, 0).unwrap();
    offset = buf.write_uint16_le(0x0302, offset).unwrap();
    offset = buf.write_uint32_be(0x0405_0607u32, offset).unwrap();
    assert_eq!(offset, 7);
    assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_signed_twos_complement() {
    let buf = zeroed(4);
    buf.write_int16_be(-2, 0).unwrap();
    buf.write_int8(-128, 2).unwrap();
    buf.write_int8(127, 3).unwrap();
    assert_eq!(buf.to_vec(), vec![0xFF, 0xFE, 0x80, 0x7F]);
    assert_eq!(buf.read_int16_be(0).unwrap(), -2);
    assert_eq!(buf.read_int8(2).unwrap(), -128);
    assert_eq!(buf.read_int32_le(0).unwrap(), 0x7F80_FEFF);
}

#[test]
fn test_value_domain_messages() {
    let buf = zeroed(8);

    let err = buf.write_uint8(256, 0).unwrap_err();
    assert_eq!(err.code(), "ERR_OUT_OF_RANGE");
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= 0 and <= 255. Received 256"
    );

    let err = buf.write_int8(-129, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= -128 and <= 127. Received -129"
    );

    let err = buf.write_uint32_le(4294967296.0, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= 0 and <= 4294967295. Received 4294967296"
    );

    let err = buf.write_uint_be(281474976710656.0, 0, 6).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= 0 and < 2 ** 48. Received 281_474_976_710_656"
    );

    let err = buf.write_int_le(-140737488355329.0, 0, 6).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= -(2 ** 47) and < 2 ** 47. Received -140_737_488_355_329"
    );
}

#[test]
fn test_offset_bounds() {
    let buf = zeroed(4);

    let err = buf.write_uint32_be(1, 1).unwrap_err();
    assert!(err.is_range_error());
    assert_eq!(
        err.to_string(),
        "The value of \"offset\" is out of range. It must be >= 0 and <= 0. Received 1"
    );

    let small = zeroed(2);
    let err = small.read_uint32_le(0).unwrap_err();
    assert_eq!(err.code(), "ERR_BUFFER_OUT_OF_BOUNDS");
    assert_eq!(err.to_string(), "Attempt to access memory outside buffer bounds");

    assert!(buf.read_uint8(-1).unwrap_err().is_range_error());
    assert_eq!(buf.read_uint8(4).unwrap_err().code(), "ERR_OUT_OF_RANGE");
}

#[test]
fn test_offset_is_never_coerced() {
    let buf = zeroed(4);
    buf.write_uint8(9, 0).unwrap();

    assert_eq!(buf.read_uint8(JsValue::Undefined).unwrap(), 9);

    for offset in [
        JsValue::from(1.5),
        JsValue::from("1"),
        JsValue::Null,
        JsValue::from(true),
        JsValue::Number(f64::NAN),
        JsValue::Number(f64::INFINITY),
    ] {
        let err = buf.read_uint8(offset.clone()).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_ARG_TYPE", "{:?}", offset);
    }

    let err = buf.read_uint8("1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The \"offset\" argument must be of type number. Received type string ('1')"
    );
}

#[test]
fn test_failed_write_leaves_bytes_untouched() {
    let buf = zeroed(4);
    assert!(buf.write_uint32_be(0xFFFF_FFFFu32, 1).is_err());
    assert!(buf.write_uint16_le(70000, 0).is_err());
    assert_eq!(buf.to_vec(), vec![0, 0, 0, 0]);
}

#[test]
fn test_value_conversion_tiers() {
    let buf = zeroed(1);
    let cases: Vec<(JsValue, u8)> = vec![
        (JsValue::from("0x1F"), 31),
        (JsValue::from(" 42 "), 42),
        (JsValue::from("1e2"), 100),
        (JsValue::from(true), 1),
        (JsValue::Null, 0),
        (JsValue::Undefined, 0),
        (JsValue::from("abc"), 0),
        (JsValue::Array(vec![JsValue::from(7)]), 7),
        (JsValue::Array(vec![]), 0),
        (JsValue::from(JsObject::with_primitive(9)), 9),
        (JsValue::from(JsObject::with_primitive("0b11")), 3),
        (JsValue::from(JsObject::plain()), 0),
        (JsValue::from(1.9), 1),
    ];
    for (value, expected) in cases {
        buf.write_uint8(value.clone(), 0).unwrap();
        assert_eq!(buf.read_uint8(0).unwrap(), expected, "{:?}", value);
    }

    buf.write_int8(-1.9, 0).unwrap();
    assert_eq!(buf.read_uint8(0).unwrap(), 0xFF);

    let hostile = JsValue::from(JsObject::with_primitive(JsObject::plain()));
    assert!(buf.write_uint8(hostile, 0).unwrap_err().is_type_error());
    assert!(buf.write_uint8(JsValue::BigInt(1), 0).unwrap_err().is_type_error());
}

#[test]
fn test_variable_width() {
    let buf = zeroed(6);
    assert_eq!(buf.write_int_le(-123456789, 0, 6).unwrap(), 6);
    assert_eq!(buf.read_int_le(0, 6).unwrap(), -123456789);

    buf.write_uint_be(0x0102_0304_0506u64 as f64, 0, 6).unwrap();
    assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(buf.read_uint_le(0, 6).unwrap(), 0x0605_0403_0201);
    assert_eq!(buf.read_uint_be(3, 3).unwrap(), 0x0405_06);
    assert_eq!(buf.read_int_be(0, 1).unwrap(), 1);

    for bad in [0, 7] {
        let err = buf.read_uint_be(0, bad).unwrap_err();
        assert_eq!(err.code(), "ERR_OUT_OF_RANGE");
    }
    assert!(buf.read_int_le(0, "6").unwrap_err().is_type_error());

    // byteLength is validated before the offset
    let err = buf.write_uint_le(1, 99, 9).unwrap_err();
    assert!(err.to_string().contains("\"byteLength\""));
}

#[test]
fn test_floats() {
    let buf = zeroed(8);
    buf.write_float_be(1.0, 0).unwrap();
    assert_eq!(&buf.to_vec()[..4], &[0x3F, 0x80, 0x00, 0x00]);

    buf.write_float_le(0.1, 0).unwrap();
    assert_eq!(buf.read_float_le(0).unwrap(), 0.1f32);

    buf.write_double_le(-0.0, 0).unwrap();
    let back = buf.read_double_le(0).unwrap();
    assert_eq!(back, 0.0);
    assert!(back.is_sign_negative());

    buf.write_double_be(f64::NEG_INFINITY, 0).unwrap();
    assert_eq!(buf.read_double_be(0).unwrap(), f64::NEG_INFINITY);

    buf.write_double_be(f64::NAN, 0).unwrap();
    assert!(buf.read_double_be(0).unwrap().is_nan());

    // Out-of-range floats narrow to infinity
    buf.write_float_be(1e40, 0).unwrap();
    assert_eq!(buf.read_float_be(0).unwrap(), f32::INFINITY);

    buf.write_double_le("2.5", 0).unwrap();
    assert_eq!(buf.read_double_le(0).unwrap(), 2.5);
}

#[test]
fn test_bigint64() {
    let buf = zeroed(8);
    assert_eq!(buf.write_big_uint64_le(u64::MAX, 0).unwrap(), 8);
    assert_eq!(buf.read_big_uint64_le(0).unwrap(), u64::MAX);
    assert_eq!(buf.read_big_int64_le(0).unwrap(), -1);

    buf.write_big_int64_be(i64::MIN, 0).unwrap();
    assert_eq!(buf.to_vec(), vec![0x80, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(buf.read_big_int64_be(0).unwrap(), i64::MIN);

    buf.write_big_uint64_be(0x0102_0304_0506_0708u64, 0).unwrap();
    assert_eq!(buf.read_big_uint64_le(0).unwrap(), 0x0807_0605_0403_0201);
}

#[test]
fn test_bigint64_validation() {
    let buf = zeroed(8);

    let err = buf.write_big_uint64_be(-1i64, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= 0n and < 2n ** 64n. Received -1n"
    );

    let err = buf.write_big_int64_le(JsValue::BigInt(1i128 << 63), 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"value\" is out of range. It must be >= -(2n ** 63n) and < 2n ** 63n. Received 9_223_372_036_854_775_808n"
    );

    let err = buf.write_big_int64_le(1, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The \"value\" argument must be of type bigint. Received type number (1)"
    );

    assert!(buf.write_big_int64_le(0i64, 1).unwrap_err().is_range_error());
}

#[test]
fn test_endian_mirror_all_widths() {
    let be = zeroed(4);
    let le = zeroed(4);
    be.write_int32_be(-0x1234_5678, 0).unwrap();
    le.write_int32_le(-0x1234_5678, 0).unwrap();
    let mut reversed = le.to_vec();
    reversed.reverse();
    assert_eq!(be.to_vec(), reversed);
}
