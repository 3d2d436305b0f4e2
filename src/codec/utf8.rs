/*!
 * UTF-8 and ASCII Classification
 *
 * Pure predicates over byte sequences. They never fail.
 */

use crate::memory::simd;

/// Validator state: how many continuation bytes remain and what range the
/// next one must fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Accept,
    /// Any continuation, `n` remaining
    Tail(u8),
    /// After `E0`: `A0..=BF`, then one tail
    E0,
    /// After `ED`: `80..=9F`, then one tail
    Ed,
    /// After `F0`: `90..=BF`, then two tails
    F0,
    /// After `F1..=F3`: any continuation, then two tails
    F1F3,
    /// After `F4`: `80..=8F`, then two tails
    F4,
}

#[inline]
fn in_range(byte: u8, lo: u8, hi: u8) -> bool {
    (lo..=hi).contains(&byte)
}

#[inline]
fn step(state: State, byte: u8) -> Option<State> {
    match state {
        State::Accept => match byte {
            0x00..=0x7F => Some(State::Accept),
            0xC2..=0xDF => Some(State::Tail(1)),
            0xE0 => Some(State::E0),
            0xED => Some(State::Ed),
            0xE1..=0xEC | 0xEE..=0xEF => Some(State::Tail(2)),
            0xF0 => Some(State::F0),
            0xF1..=0xF3 => Some(State::F1F3),
            0xF4 => Some(State::F4),
            // 80..=C1 and F5..=FF never start a sequence
            _ => None,
        },
        State::Tail(n) if in_range(byte, 0x80, 0xBF) => {
            Some(if n == 1 { State::Accept } else { State::Tail(n - 1) })
        }
        State::E0 if in_range(byte, 0xA0, 0xBF) => Some(State::Tail(1)),
        State::Ed if in_range(byte, 0x80, 0x9F) => Some(State::Tail(1)),
        State::F0 if in_range(byte, 0x90, 0xBF) => Some(State::Tail(2)),
        State::F1F3 if in_range(byte, 0x80, 0xBF) => Some(State::Tail(2)),
        State::F4 if in_range(byte, 0x80, 0x8F) => Some(State::Tail(2)),
        _ => None,
    }
}

/// Check whether `bytes` is well-formed UTF-8
///
/// Overlong forms, surrogates, code points above U+10FFFF and truncated
/// sequences are rejected.
pub fn is_utf8(bytes: &[u8]) -> bool {
    if simd::is_ascii(bytes) {
        return true;
    }
    let mut state = State::Accept;
    for &byte in bytes {
        match step(state, byte) {
            Some(next) => state = next,
            None => return false,
        }
    }
    state == State::Accept
}

/// Check whether every byte is `<= 0x7F`
#[inline]
pub fn is_ascii(bytes: &[u8]) -> bool {
    simd::is_ascii(bytes)
}
