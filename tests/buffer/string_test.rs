/*!
 * String Codec Tests
 * Encodings, lenient decoders, byte lengths and transcoding
 */

use ai_os_buffer::{BufferView, Encoding};
use pretty_assertions::assert_eq;

fn bytes(s: &str, encoding: Encoding) -> Vec<u8> {
    BufferView::from_string(s, encoding).unwrap().to_vec()
}

#[test]
fn test_base64_scenario() {
    let buf = BufferView::from_bytes(&[0x61]).unwrap();
    assert_eq!(buf.decode(Encoding::Base64), "YQ==");
    assert_eq!(bytes("YQ==", Encoding::Base64), vec![0x61]);
}

#[test]
fn test_base64_padding_counts() {
    let cases: [(&[u8], &str); 4] = [
        (b"", ""),
        (b"f", "Zg=="),
        (b"fo", "Zm8="),
        (b"foo", "Zm9v"),
    ];
    for (input, expected) in cases {
        let buf = BufferView::from_bytes(input).unwrap();
        assert_eq!(buf.decode(Encoding::Base64), expected);
    }
}

#[test]
fn test_base64_lenient_decode() {
    assert_eq!(bytes("Zm9v YmFy", Encoding::Base64), b"foobar".to_vec());
    assert_eq!(bytes("Zm9v\nYmFy", Encoding::Base64), b"foobar".to_vec());
    assert_eq!(bytes("Zm9v!!!!", Encoding::Base64), b"foo".to_vec());
    assert_eq!(bytes("Zm9", Encoding::Base64), b"fo".to_vec());
    assert_eq!(bytes("Zm9v-_8", Encoding::Base64), vec![b'f', b'o', b'o', 0xFB, 0xFF]);
}

#[test]
fn test_base64url() {
    let buf = BufferView::from_bytes(&[0xFB, 0xFF, 0xBF]).unwrap();
    assert_eq!(buf.decode(Encoding::Base64url), "-_-_");
    assert_eq!(buf.decode(Encoding::Base64), "+/+/");
    assert_eq!(bytes("-_-_", Encoding::Base64url), vec![0xFB, 0xFF, 0xBF]);
    assert_eq!(bytes("+/+/", Encoding::Base64url), vec![0xFB, 0xFF, 0xBF]);
}

#[test]
fn test_hex() {
    let buf = BufferView::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    assert_eq!(buf.decode(Encoding::Hex), "deadbeef");
    assert_eq!(bytes("DEADbeef", Encoding::Hex), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(bytes("abc", Encoding::Hex), vec![0xAB]);
    assert_eq!(bytes("abzzcd", Encoding::Hex), vec![0xAB]);
    assert!(bytes("zz", Encoding::Hex).is_empty());
}

#[test]
fn test_charsets() {
    assert_eq!(bytes("héllo", Encoding::Utf8), vec![0x68, 0xC3, 0xA9, 0x6C, 0x6C, 0x6F]);
    assert_eq!(bytes("hé", Encoding::Utf16le), vec![0x68, 0x00, 0xE9, 0x00]);
    assert_eq!(bytes("hé", Encoding::Latin1), vec![0x68, 0xE9]);
    assert_eq!(bytes("hé", Encoding::Ascii), vec![0x68, 0xE9]);

    let high = BufferView::from_bytes(&[0x68, 0xE9]).unwrap();
    assert_eq!(high.decode(Encoding::Latin1), "hé");
    assert_eq!(high.decode(Encoding::Ascii), "hi");
    assert_eq!(high.decode(Encoding::Utf8), "h\u{FFFD}");
}

#[test]
fn test_utf16_surrogate_pairs() {
    let clef = "𝄞";
    assert_eq!(bytes(clef, Encoding::Utf16le), vec![0x34, 0xD8, 0x1E, 0xDD]);
    let buf = BufferView::from_string(clef, Encoding::Utf16le).unwrap();
    assert_eq!(buf.decode(Encoding::Utf16le), clef);

    // Odd trailing byte is ignored
    let odd = BufferView::from_bytes(&[0x61, 0x00, 0x62]).unwrap();
    assert_eq!(odd.decode(Encoding::Utf16le), "a");
}

#[test]
fn test_byte_length_matches_encode() {
    let inputs = ["", "abc", "héllo", "𝄞 clef", "e\u{301}", "YWJj", "Zm9v!", "deadbeefz"];
    let encodings = [
        Encoding::Utf8,
        Encoding::Utf16le,
        Encoding::Latin1,
        Encoding::Ascii,
        Encoding::Hex,
        Encoding::Base64,
        Encoding::Base64url,
    ];
    for input in inputs {
        for encoding in encodings {
            assert_eq!(
                BufferView::byte_length(input, encoding),
                bytes(input, encoding).len(),
                "{:?} as {}",
                input,
                encoding
            );
        }
    }
}

#[test]
fn test_encoding_names() {
    assert!(BufferView::is_encoding("UTF-8"));
    assert!(BufferView::is_encoding("binary"));
    assert!(BufferView::is_encoding("ucs-2"));
    assert!(!BufferView::is_encoding("utf-16be"));

    let err = "latin2".parse::<Encoding>().unwrap_err();
    assert_eq!(err.code(), "ERR_UNKNOWN_ENCODING");
}

#[test]
fn test_write_string() {
    let buf = BufferView::alloc(6).unwrap();
    assert_eq!(buf.write_string("héllo", 0, None, Encoding::Utf8).unwrap(), 6);
    assert_eq!(buf.decode(Encoding::Utf8), "héllo");

    // é does not fit in the single remaining byte
    let tight = BufferView::alloc(2).unwrap();
    assert_eq!(tight.write_string("hé", 0, Some(2), Encoding::Utf8).unwrap(), 1);
    assert_eq!(tight.to_vec(), vec![b'h', 0]);
}

#[test]
fn test_transcode() {
    let source = BufferView::from_string("€uro", Encoding::Utf8).unwrap();
    let utf16 = BufferView::transcode(&source, Encoding::Utf8, Encoding::Utf16le).unwrap();
    assert_eq!(utf16.decode(Encoding::Utf16le), "€uro");

    let back = BufferView::transcode(&utf16, Encoding::Utf16le, Encoding::Utf8).unwrap();
    assert_eq!(back, source);
    assert!(!back.shares_memory_with(&source));

    let latin = BufferView::from_string("café", Encoding::Utf8).unwrap();
    let narrowed = BufferView::transcode(&latin, Encoding::Utf8, Encoding::Latin1).unwrap();
    assert_eq!(narrowed.to_vec(), b"caf\xE9".to_vec());

    let err = BufferView::transcode(&source, Encoding::Utf8, Encoding::Latin1).unwrap_err();
    assert_eq!(err.to_string(), "Unable to transcode Buffer [U_ILLEGAL_ARGUMENT_ERROR]");

    let invalid = BufferView::from_bytes(&[0xC0, 0x80]).unwrap();
    assert!(BufferView::transcode(&invalid, Encoding::Utf8, Encoding::Utf16le).is_err());
}
