/*!
 * Base64 and Base64url
 *
 * Encoding uses the `base64` engines. Decoding is lenient: both alphabets are
 * accepted, ASCII whitespace is skipped, and the first `=` or other character
 * outside the alphabet ends the input. Whatever was decoded up to that point
 * is returned.
 */

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Standard alphabet with `=` padding
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// URL-safe alphabet, unpadded
pub fn encode_url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[inline]
fn sextet(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A'),
        b'a'..=b'z' => Some(c - b'a' + 26),
        b'0'..=b'9' => Some(c - b'0' + 52),
        b'+' | b'-' => Some(62),
        b'/' | b'_' => Some(63),
        _ => None,
    }
}

/// Sextets up to the first terminator
fn sextets(input: &str) -> impl Iterator<Item = u8> + '_ {
    input
        .bytes()
        .filter(|c| !c.is_ascii_whitespace())
        .map(sextet)
        .take_while(Option::is_some)
        .flatten()
}

/// Bytes produced by a run of `count` sextets
#[inline]
fn bytes_for(count: usize) -> usize {
    let tail = match count % 4 {
        2 => 1,
        3 => 2,
        _ => 0,
    };
    count / 4 * 3 + tail
}

/// Lenient decode of either alphabet
pub fn decode(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() / 4 * 3 + 2);
    let mut acc: u32 = 0;
    let mut pending = 0;

    for value in sextets(input) {
        acc = (acc << 6) | value as u32;
        pending += 1;
        if pending == 4 {
            out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]);
            acc = 0;
            pending = 0;
        }
    }

    match pending {
        2 => out.push((acc >> 4) as u8),
        3 => out.extend_from_slice(&[(acc >> 10) as u8, (acc >> 2) as u8]),
        // A lone trailing sextet carries no complete byte
        _ => {}
    }
    out
}

/// Number of bytes [`decode`] produces for `input`
pub fn decoded_len(input: &str) -> usize {
    bytes_for(sextets(input).count())
}
