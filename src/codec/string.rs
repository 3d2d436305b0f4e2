/*!
 * String Codecs
 *
 * Conversion between text and bytes for every [`Encoding`].
 *
 * # Tolerance
 *
 * Decoding bytes to text never fails: invalid UTF-8 and unpaired UTF-16
 * surrogates become U+FFFD, and malformed hex/base64 input decodes as far as
 * it is valid. Transcoding between charsets is strict and reports invalid
 * input instead of substituting.
 */

use tracing::debug;

use super::encoding::Encoding;
use super::{base64, hex};
use crate::core::errors::{BufferError, BufferResult};
use crate::memory::BufferView;

/// Encode `s` into the bytes it represents under `encoding`
pub fn encode(s: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => s.as_bytes().to_vec(),
        Encoding::Utf16le => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        // One byte per UTF-16 unit, keeping the low eight bits
        Encoding::Latin1 | Encoding::Ascii => s.encode_utf16().map(|unit| unit as u8).collect(),
        Encoding::Hex => hex::decode(s),
        Encoding::Base64 | Encoding::Base64url => base64::decode(s),
    }
}

/// Exact number of bytes [`encode`] produces
pub fn byte_length(s: &str, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Utf8 => s.len(),
        Encoding::Utf16le => s.encode_utf16().count() * 2,
        Encoding::Latin1 | Encoding::Ascii => s.encode_utf16().count(),
        Encoding::Hex => hex::decoded_len(s),
        Encoding::Base64 | Encoding::Base64url => base64::decoded_len(s),
    }
}

/// Render bytes as text under `encoding`
pub fn decode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf16le => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        Encoding::Ascii => bytes.iter().map(|&b| char::from(b & 0x7F)).collect(),
        Encoding::Hex => hex::encode(bytes),
        Encoding::Base64 => base64::encode(bytes),
        Encoding::Base64url => base64::encode_url(bytes),
    }
}

fn transcode_error() -> BufferError {
    BufferError::Transcode("U_ILLEGAL_ARGUMENT_ERROR".to_string())
}

fn is_charset(encoding: Encoding) -> bool {
    matches!(
        encoding,
        Encoding::Utf8 | Encoding::Utf16le | Encoding::Latin1 | Encoding::Ascii
    )
}

fn strict_decode(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
        Encoding::Utf16le => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        Encoding::Ascii => bytes
            .iter()
            .map(|&b| b.is_ascii().then(|| char::from(b)))
            .collect(),
        _ => None,
    }
}

fn strict_encode(text: &str, encoding: Encoding) -> Option<Vec<u8>> {
    match encoding {
        Encoding::Utf8 | Encoding::Utf16le => Some(encode(text, encoding)),
        Encoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).ok())
            .collect(),
        // Lossy by contract: high bits are dropped
        Encoding::Ascii => Some(text.chars().map(|c| (u32::from(c) & 0x7F) as u8).collect()),
        _ => None,
    }
}

/// Re-encode `source` from one charset to another
///
/// Only utf8, utf16le, latin1 and ascii take part. Source bytes that are not
/// valid in `from`, and characters that `to` cannot represent (latin1 above
/// U+00FF), fail instead of being replaced.
pub fn transcode_bytes(source: &[u8], from: Encoding, to: Encoding) -> BufferResult<Vec<u8>> {
    if !is_charset(from) || !is_charset(to) {
        debug!(%from, %to, "Unsupported transcode pair");
        return Err(transcode_error());
    }
    if from == to {
        return Ok(source.to_vec());
    }

    let text = strict_decode(source, from).ok_or_else(|| {
        debug!(%from, len = source.len(), "Transcode source is not valid");
        transcode_error()
    })?;
    strict_encode(&text, to).ok_or_else(|| {
        debug!(%to, "Transcode target cannot represent source");
        transcode_error()
    })
}

/// Largest prefix of `encoded` that fits in `room` without splitting a character
fn fit_prefix(s: &str, encoded: &[u8], room: usize, encoding: Encoding) -> usize {
    if encoded.len() <= room {
        return encoded.len();
    }
    match encoding {
        Encoding::Utf8 => {
            let mut end = room;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            end
        }
        Encoding::Utf16le => room & !1,
        _ => room,
    }
}

impl BufferView {
    /// Text rendering of the whole view
    pub fn decode(&self, encoding: Encoding) -> String {
        self.with_bytes(|bytes| decode(bytes, encoding))
    }

    /// Text rendering of `[start, end)`, clamped to the view
    pub fn decode_range(&self, encoding: Encoding, start: usize, end: Option<usize>) -> String {
        let end = end.map_or(self.len(), |e| e.min(self.len()));
        if start >= end {
            return String::new();
        }
        self.with_bytes(|bytes| decode(&bytes[start..end], encoding))
    }

    /// Encode `s` into the view at `offset`, writing at most `length` bytes
    ///
    /// Returns the number of bytes written. Characters that do not fit
    /// entirely are not written.
    pub fn write_string(
        &self,
        s: &str,
        offset: usize,
        length: Option<usize>,
        encoding: Encoding,
    ) -> BufferResult<usize> {
        if offset > self.len() {
            return Err(BufferError::out_of_range(
                "offset",
                format!(">= 0 && <= {}", self.len()),
                offset.to_string(),
            ));
        }
        let remaining = self.len() - offset;
        let room = length.map_or(remaining, |l| l.min(remaining));

        let encoded = encode(s, encoding);
        let count = fit_prefix(s, &encoded, room, encoding);
        self.with_bytes_mut(|bytes| bytes[offset..offset + count].copy_from_slice(&encoded[..count]));
        Ok(count)
    }
}
