/*!
 * Numeric Codecs
 *
 * Bit-exact fixed-width integer and IEEE-754 encode/decode over views.
 *
 * # Write contract
 *
 * 1. The value is converted (`JsValue::to_number`, BigInt for 64-bit fields)
 * 2. It is checked against the field's domain (NaN passes and stores 0)
 * 3. The offset is bounds-checked
 * 4. Bytes are stored; the return value is `offset + width`
 *
 * Fractional integer values are truncated toward zero after the domain check.
 * Single-precision writes round to the nearest `f32`; that is not an error.
 */

use super::bounds;
use crate::core::errors::{BufferError, BufferResult};
use crate::core::value::{format_received_bigint, format_received_number, JsValue};
use crate::memory::BufferView;

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte at the lowest address
    Big,
    /// Least significant byte at the lowest address
    Little,
}

/// Store the low `dst.len()` bytes of `value`
#[inline]
pub fn encode_uint(dst: &mut [u8], value: u64, order: ByteOrder) {
    let width = dst.len();
    for i in 0..width {
        let byte = (value >> (8 * i)) as u8;
        match order {
            ByteOrder::Little => dst[i] = byte,
            ByteOrder::Big => dst[width - 1 - i] = byte,
        }
    }
}

/// Load an unsigned value of `src.len()` bytes
#[inline]
pub fn decode_uint(src: &[u8], order: ByteOrder) -> u64 {
    match order {
        ByteOrder::Big => src.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64),
        ByteOrder::Little => src.iter().rev().fold(0u64, |acc, &b| (acc << 8) | b as u64),
    }
}

/// Sign-extend the low `width` bytes of `bits`
#[inline]
pub fn sign_extend(bits: u64, width: usize) -> i64 {
    let shift = 64 - 8 * width as u32;
    ((bits << shift) as i64) >> shift
}

/// Value domain of a `width`-byte integer as f64 bounds
fn int_domain(width: usize, signed: bool) -> (f64, f64) {
    let bits = 8 * width as i32;
    if signed {
        let half = 2f64.powi(bits - 1);
        (-half, half - 1.0)
    } else {
        (0.0, 2f64.powi(bits) - 1.0)
    }
}

fn int_domain_description(width: usize, signed: bool) -> String {
    let bits = 8 * width;
    if width > 4 {
        if signed {
            format!(">= -(2 ** {}) and < 2 ** {}", bits - 1, bits - 1)
        } else {
            format!(">= 0 and < 2 ** {}", bits)
        }
    } else {
        let (min, max) = int_domain(width, signed);
        format!(">= {} and <= {}", min, max)
    }
}

impl BufferView {
    fn read_bits(&self, offset: JsValue, width: usize, order: ByteOrder) -> BufferResult<u64> {
        let index = bounds::check(self.len(), &offset, width)?;
        Ok(self.with_bytes(|bytes| decode_uint(&bytes[index..index + width], order)))
    }

    fn store_bits(&self, index: usize, width: usize, bits: u64, order: ByteOrder) -> usize {
        self.with_bytes_mut(|bytes| encode_uint(&mut bytes[index..index + width], bits, order));
        index + width
    }

    fn write_integer(
        &self,
        value: JsValue,
        offset: JsValue,
        width: usize,
        signed: bool,
        order: ByteOrder,
    ) -> BufferResult<usize> {
        let n = value.to_number()?;
        let (min, max) = int_domain(width, signed);
        if n < min || n > max {
            return Err(BufferError::out_of_range(
                "value",
                int_domain_description(width, signed),
                format_received_number(n),
            ));
        }
        let index = bounds::check(self.len(), &offset, width)?;
        // NaN saturates to 0
        let bits = n.trunc() as i64 as u64;
        Ok(self.store_bits(index, width, bits, order))
    }

    fn write_bigint(
        &self,
        value: JsValue,
        offset: JsValue,
        signed: bool,
        order: ByteOrder,
    ) -> BufferResult<usize> {
        let v = match value {
            JsValue::BigInt(v) => v,
            other => {
                return Err(BufferError::invalid_arg_type(
                    "value",
                    "of type bigint",
                    other.describe(),
                ))
            }
        };
        let (min, max, range) = if signed {
            (
                -(1i128 << 63),
                (1i128 << 63) - 1,
                ">= -(2n ** 63n) and < 2n ** 63n",
            )
        } else {
            (0, (1i128 << 64) - 1, ">= 0n and < 2n ** 64n")
        };
        if v < min || v > max {
            return Err(BufferError::out_of_range(
                "value",
                range,
                format_received_bigint(v),
            ));
        }
        let index = bounds::check(self.len(), &offset, 8)?;
        Ok(self.store_bits(index, 8, v as u64, order))
    }

    fn write_float(
        &self,
        value: JsValue,
        offset: JsValue,
        width: usize,
        order: ByteOrder,
    ) -> BufferResult<usize> {
        let n = value.to_number()?;
        let index = bounds::check(self.len(), &offset, width)?;
        let bits = if width == 4 {
            (n as f32).to_bits() as u64
        } else {
            n.to_bits()
        };
        Ok(self.store_bits(index, width, bits, order))
    }

    // ---------------------------------------------------------------------
    // 8-bit
    // ---------------------------------------------------------------------

    pub fn read_uint8(&self, offset: impl Into<JsValue>) -> BufferResult<u8> {
        Ok(self.read_bits(offset.into(), 1, ByteOrder::Big)? as u8)
    }

    pub fn read_int8(&self, offset: impl Into<JsValue>) -> BufferResult<i8> {
        Ok(self.read_bits(offset.into(), 1, ByteOrder::Big)? as u8 as i8)
    }

    pub fn write_uint8(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 1, false, ByteOrder::Big)
    }

    pub fn write_int8(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 1, true, ByteOrder::Big)
    }

    // ---------------------------------------------------------------------
    // 16-bit
    // ---------------------------------------------------------------------

    pub fn read_uint16_be(&self, offset: impl Into<JsValue>) -> BufferResult<u16> {
        Ok(self.read_bits(offset.into(), 2, ByteOrder::Big)? as u16)
    }

    pub fn read_uint16_le(&self, offset: impl Into<JsValue>) -> BufferResult<u16> {
        Ok(self.read_bits(offset.into(), 2, ByteOrder::Little)? as u16)
    }

    pub fn read_int16_be(&self, offset: impl Into<JsValue>) -> BufferResult<i16> {
        Ok(self.read_bits(offset.into(), 2, ByteOrder::Big)? as u16 as i16)
    }

    pub fn read_int16_le(&self, offset: impl Into<JsValue>) -> BufferResult<i16> {
        Ok(self.read_bits(offset.into(), 2, ByteOrder::Little)? as u16 as i16)
    }

    pub fn write_uint16_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 2, false, ByteOrder::Big)
    }

    pub fn write_uint16_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 2, false, ByteOrder::Little)
    }

    pub fn write_int16_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 2, true, ByteOrder::Big)
    }

    pub fn write_int16_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 2, true, ByteOrder::Little)
    }

    // ---------------------------------------------------------------------
    // 32-bit
    // ---------------------------------------------------------------------

    pub fn read_uint32_be(&self, offset: impl Into<JsValue>) -> BufferResult<u32> {
        Ok(self.read_bits(offset.into(), 4, ByteOrder::Big)? as u32)
    }

    pub fn read_uint32_le(&self, offset: impl Into<JsValue>) -> BufferResult<u32> {
        Ok(self.read_bits(offset.into(), 4, ByteOrder::Little)? as u32)
    }

    pub fn read_int32_be(&self, offset: impl Into<JsValue>) -> BufferResult<i32> {
        Ok(self.read_bits(offset.into(), 4, ByteOrder::Big)? as u32 as i32)
    }

    pub fn read_int32_le(&self, offset: impl Into<JsValue>) -> BufferResult<i32> {
        Ok(self.read_bits(offset.into(), 4, ByteOrder::Little)? as u32 as i32)
    }

    pub fn write_uint32_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 4, false, ByteOrder::Big)
    }

    pub fn write_uint32_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 4, false, ByteOrder::Little)
    }

    pub fn write_int32_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 4, true, ByteOrder::Big)
    }

    pub fn write_int32_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_integer(value.into(), offset.into(), 4, true, ByteOrder::Little)
    }

    // ---------------------------------------------------------------------
    // Variable width (1..=6 bytes)
    // ---------------------------------------------------------------------

    fn read_variable(
        &self,
        offset: JsValue,
        byte_length: JsValue,
        order: ByteOrder,
    ) -> BufferResult<(u64, usize)> {
        let width = bounds::check_byte_length(&byte_length)?;
        Ok((self.read_bits(offset, width, order)?, width))
    }

    pub fn read_uint_be(
        &self,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<u64> {
        Ok(self.read_variable(offset.into(), byte_length.into(), ByteOrder::Big)?.0)
    }

    pub fn read_uint_le(
        &self,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<u64> {
        Ok(self.read_variable(offset.into(), byte_length.into(), ByteOrder::Little)?.0)
    }

    pub fn read_int_be(
        &self,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<i64> {
        let (bits, width) = self.read_variable(offset.into(), byte_length.into(), ByteOrder::Big)?;
        Ok(sign_extend(bits, width))
    }

    pub fn read_int_le(
        &self,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<i64> {
        let (bits, width) =
            self.read_variable(offset.into(), byte_length.into(), ByteOrder::Little)?;
        Ok(sign_extend(bits, width))
    }

    pub fn write_uint_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        let width = bounds::check_byte_length(&byte_length.into())?;
        self.write_integer(value.into(), offset.into(), width, false, ByteOrder::Big)
    }

    pub fn write_uint_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        let width = bounds::check_byte_length(&byte_length.into())?;
        self.write_integer(value.into(), offset.into(), width, false, ByteOrder::Little)
    }

    pub fn write_int_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        let width = bounds::check_byte_length(&byte_length.into())?;
        self.write_integer(value.into(), offset.into(), width, true, ByteOrder::Big)
    }

    pub fn write_int_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
        byte_length: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        let width = bounds::check_byte_length(&byte_length.into())?;
        self.write_integer(value.into(), offset.into(), width, true, ByteOrder::Little)
    }

    // ---------------------------------------------------------------------
    // IEEE-754
    // ---------------------------------------------------------------------

    pub fn read_float_be(&self, offset: impl Into<JsValue>) -> BufferResult<f32> {
        Ok(f32::from_bits(self.read_bits(offset.into(), 4, ByteOrder::Big)? as u32))
    }

    pub fn read_float_le(&self, offset: impl Into<JsValue>) -> BufferResult<f32> {
        Ok(f32::from_bits(self.read_bits(offset.into(), 4, ByteOrder::Little)? as u32))
    }

    pub fn read_double_be(&self, offset: impl Into<JsValue>) -> BufferResult<f64> {
        Ok(f64::from_bits(self.read_bits(offset.into(), 8, ByteOrder::Big)?))
    }

    pub fn read_double_le(&self, offset: impl Into<JsValue>) -> BufferResult<f64> {
        Ok(f64::from_bits(self.read_bits(offset.into(), 8, ByteOrder::Little)?))
    }

    pub fn write_float_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_float(value.into(), offset.into(), 4, ByteOrder::Big)
    }

    pub fn write_float_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_float(value.into(), offset.into(), 4, ByteOrder::Little)
    }

    pub fn write_double_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_float(value.into(), offset.into(), 8, ByteOrder::Big)
    }

    pub fn write_double_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_float(value.into(), offset.into(), 8, ByteOrder::Little)
    }

    // ---------------------------------------------------------------------
    // 64-bit integers (BigInt)
    // ---------------------------------------------------------------------

    pub fn read_big_uint64_be(&self, offset: impl Into<JsValue>) -> BufferResult<u64> {
        self.read_bits(offset.into(), 8, ByteOrder::Big)
    }

    pub fn read_big_uint64_le(&self, offset: impl Into<JsValue>) -> BufferResult<u64> {
        self.read_bits(offset.into(), 8, ByteOrder::Little)
    }

    pub fn read_big_int64_be(&self, offset: impl Into<JsValue>) -> BufferResult<i64> {
        Ok(self.read_bits(offset.into(), 8, ByteOrder::Big)? as i64)
    }

    pub fn read_big_int64_le(&self, offset: impl Into<JsValue>) -> BufferResult<i64> {
        Ok(self.read_bits(offset.into(), 8, ByteOrder::Little)? as i64)
    }

    pub fn write_big_uint64_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_bigint(value.into(), offset.into(), false, ByteOrder::Big)
    }

    pub fn write_big_uint64_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_bigint(value.into(), offset.into(), false, ByteOrder::Little)
    }

    pub fn write_big_int64_be(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_bigint(value.into(), offset.into(), true, ByteOrder::Big)
    }

    pub fn write_big_int64_le(
        &self,
        value: impl Into<JsValue>,
        offset: impl Into<JsValue>,
    ) -> BufferResult<usize> {
        self.write_bigint(value.into(), offset.into(), true, ByteOrder::Little)
    }
}
