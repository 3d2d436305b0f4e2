/*!
 * Bounds Checking
 *
 * Validates every `(offset, width)` pair before a codec touches memory.
 * Nothing is written when validation fails.
 */

use crate::core::errors::{BufferError, BufferResult};
use crate::core::limits::MAX_VARIABLE_INT_WIDTH;
use crate::core::value::JsValue;

/// Accept an integral offset argument; `undefined` means 0
///
/// Offsets are never coerced from other types.
fn integral_offset(offset: &JsValue) -> BufferResult<f64> {
    match offset {
        JsValue::Undefined => Ok(0.0),
        JsValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n),
        JsValue::Number(_) => Err(BufferError::invalid_arg_type(
            "offset",
            "an integer",
            offset.describe(),
        )),
        other => Err(BufferError::invalid_arg_type(
            "offset",
            "of type number",
            other.describe(),
        )),
    }
}

/// Validate an offset argument against a view of `view_len` for a `width`-byte access
pub fn check(view_len: usize, offset: &JsValue, width: usize) -> BufferResult<usize> {
    let n = integral_offset(offset)?;
    if view_len < width {
        return Err(BufferError::BufferOutOfBounds { name: None });
    }
    let last = view_len - width;
    if n < 0.0 || n > last as f64 {
        return Err(BufferError::out_of_range(
            "offset",
            format!(">= 0 and <= {}", last),
            offset.describe_range(),
        ));
    }
    Ok(n as usize)
}

/// Validate the `byteLength` argument of the variable-width integer family
pub fn check_byte_length(byte_length: &JsValue) -> BufferResult<usize> {
    let range = format!(">= 1 and <= {}", MAX_VARIABLE_INT_WIDTH);
    match byte_length {
        JsValue::Number(n) => {
            if !n.is_finite() || n.fract() != 0.0 {
                Err(BufferError::out_of_range(
                    "byteLength",
                    "an integer",
                    byte_length.describe_range(),
                ))
            } else if *n >= 1.0 && *n <= MAX_VARIABLE_INT_WIDTH as f64 {
                Ok(*n as usize)
            } else {
                Err(BufferError::out_of_range(
                    "byteLength",
                    range,
                    byte_length.describe_range(),
                ))
            }
        }
        other => Err(BufferError::invalid_arg_type(
            "byteLength",
            "of type number",
            other.describe(),
        )),
    }
}
