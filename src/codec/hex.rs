/*!
 * Hex Encoding
 */

/// Two lowercase digits per byte
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[inline]
fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Case-insensitive decode
///
/// A trailing odd digit is dropped and the first pair containing a non-hex
/// character ends the decode; the bytes before it are returned.
pub fn decode(input: &str) -> Vec<u8> {
    if let Ok(bytes) = hex::decode(input) {
        return bytes;
    }
    input
        .as_bytes()
        .chunks_exact(2)
        .map_while(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

/// Number of bytes [`decode`] produces for `input`
pub fn decoded_len(input: &str) -> usize {
    input
        .as_bytes()
        .chunks_exact(2)
        .take_while(|pair| nibble(pair[0]).is_some() && nibble(pair[1]).is_some())
        .count()
}
