/*!
 * Codec Module
 *
 * Everything that interprets bytes: bounds validation, numeric fields and
 * text encodings. Codecs operate on existing views and only allocate when
 * they produce new bytes.
 */

pub mod base64;
pub mod bounds;
pub mod encoding;
pub mod hex;
pub mod numeric;
pub mod string;
pub mod utf8;

// Re-export for convenience
pub use encoding::Encoding;
pub use numeric::ByteOrder;
pub use string::transcode_bytes;
pub use utf8::{is_ascii, is_utf8};
