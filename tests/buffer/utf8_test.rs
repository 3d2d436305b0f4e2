/*!
 * UTF-8 / ASCII Classification Tests
 */

use ai_os_buffer::codec::{is_ascii, is_utf8};
use ai_os_buffer::BufferView;

#[test]
fn test_snowman_and_truncation() {
    assert!(is_utf8(&[0xE2, 0x98, 0x83]));
    assert!(!is_utf8(&[0xE2, 0x98]));
}

#[test]
fn test_ascii_runs_are_valid() {
    let all: Vec<u8> = (0x00..=0x7F).collect();
    assert!(is_utf8(&all));
    assert!(is_utf8(&all.repeat(9)));
    assert!(is_ascii(&all.repeat(9)));
}

#[test]
fn test_overlong_two_byte() {
    assert!(!is_utf8(&[0xC0, 0x80]));
    for second in 0x00..=0xFFu8 {
        assert!(!is_utf8(&[0xC1, second]));
    }
    assert!(is_utf8(&[0xC2, 0x80]));
}

#[test]
fn test_three_byte_boundaries() {
    assert!(!is_utf8(&[0xE0, 0x80, 0x80]));
    assert!(!is_utf8(&[0xE0, 0x9F, 0xBF]));
    assert!(is_utf8(&[0xE0, 0xA0, 0x80]));
    // Surrogates
    assert!(!is_utf8(&[0xED, 0xA0, 0x80]));
    assert!(!is_utf8(&[0xED, 0xBF, 0xBF]));
    assert!(is_utf8(&[0xED, 0x9F, 0xBF]));
    assert!(is_utf8(&[0xEF, 0xBF, 0xBF]));
    assert!(!is_utf8(&[0xE1, 0x80, 0xC0]));
}

#[test]
fn test_four_byte_boundaries() {
    assert!(!is_utf8(&[0xF0, 0x8F, 0xBF, 0xBF]));
    assert!(is_utf8(&[0xF0, 0x90, 0x80, 0x80]));
    assert!(!is_utf8(&[0xF4, 0x90, 0x80, 0x80]));
    assert!(is_utf8(&[0xF4, 0x8F, 0xBF, 0xBF]));
    assert!(!is_utf8(&[0xF5, 0x80, 0x80, 0x80]));
    assert!(!is_utf8(&[0xF1, 0x80, 0x80]));
}

#[test]
fn test_stray_continuation() {
    assert!(!is_utf8(&[0x61, 0x80, 0x62]));
    assert!(!is_utf8(&[0xBF]));
}

#[test]
fn test_long_mixed_input() {
    let text = "Grüße, 世界! 🎉 ".repeat(40);
    assert!(is_utf8(text.as_bytes()));

    let mut broken = text.into_bytes();
    let last = broken.len() - 2;
    broken[last] = 0xFF;
    assert!(!is_utf8(&broken));
}

#[test]
fn test_view_classifiers() {
    let view = BufferView::from_bytes("añb".as_bytes()).unwrap();
    assert!(view.is_utf8());
    assert!(!view.is_ascii());
    assert!(view.slice(0, 1).is_ascii());
    // Slicing through the middle of ñ
    assert!(!view.slice(0, 2).is_utf8());
}
