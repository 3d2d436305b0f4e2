/*!
 * Buffer Views
 *
 * A view is an `(region, offset, length)` window. Views created by slicing
 * alias their parent; views created by copying own a fresh region.
 */

use std::fmt;

use super::region::MemoryRegion;
use crate::codec::encoding::Encoding;
use crate::codec::string;
use crate::core::config;
use crate::core::errors::{BufferError, BufferResult};

/// Window over a shared memory region
///
/// # Aliasing
///
/// Cloning, slicing and `subarray` never copy: writes through any of them are
/// visible through all of them. Use [`BufferView::copy_bytes`] for an
/// independent copy.
///
/// Mutating methods take `&self`; the region serializes access internally.
#[derive(Clone)]
pub struct BufferView {
    region: MemoryRegion,
    offset: usize,
    length: usize,
}

/// Value accepted by [`BufferView::fill`]
#[derive(Debug, Clone, Copy)]
pub enum FillValue<'a> {
    Byte(u8),
    Str(&'a str, Encoding),
    Bytes(&'a [u8]),
}

impl From<u8> for FillValue<'_> {
    fn from(v: u8) -> Self {
        FillValue::Byte(v)
    }
}

impl<'a> From<&'a str> for FillValue<'a> {
    fn from(v: &'a str) -> Self {
        FillValue::Str(v, Encoding::Utf8)
    }
}

impl<'a> From<&'a [u8]> for FillValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        FillValue::Bytes(v)
    }
}

/// Needle accepted by the search methods
#[derive(Debug, Clone, Copy)]
pub enum Needle<'a> {
    Byte(u8),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl From<u8> for Needle<'_> {
    fn from(v: u8) -> Self {
        Needle::Byte(v)
    }
}

impl<'a> From<&'a str> for Needle<'a> {
    fn from(v: &'a str) -> Self {
        Needle::Str(v)
    }
}

impl<'a> From<&'a [u8]> for Needle<'a> {
    fn from(v: &'a [u8]) -> Self {
        Needle::Bytes(v)
    }
}

/// Clamp a relative index into `[0, length]`, counting negatives from the end
fn adjust_offset(offset: isize, length: usize) -> usize {
    if offset < 0 {
        let from_end = length as isize + offset;
        from_end.max(0) as usize
    } else {
        (offset as usize).min(length)
    }
}

impl BufferView {
    /// Window over `region[offset..offset + length]`
    ///
    /// Callers guarantee `offset + length <= region.capacity()`.
    pub(crate) fn new(region: MemoryRegion, offset: usize, length: usize) -> Self {
        debug_assert!(offset + length <= region.capacity());
        Self {
            region,
            offset,
            length,
        }
    }

    /// View covering an entire region
    pub fn over(region: MemoryRegion) -> Self {
        let length = region.capacity();
        Self::new(region, 0, length)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Offset of this view inside its region
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.offset
    }

    /// Backing region handle
    #[inline]
    pub fn region(&self) -> &MemoryRegion {
        &self.region
    }

    /// Check whether both views are backed by the same allocation
    pub fn shares_memory_with(&self, other: &BufferView) -> bool {
        self.region.ptr_eq(&other.region)
    }

    /// Run `f` over the bytes of this view
    ///
    /// Holds the region's read lock for the duration of `f`; `f` must not
    /// allocate or write through any view of the same region.
    pub(crate) fn with_bytes<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        self.region
            .read(|bytes| f(&bytes[self.offset..self.offset + self.length]))
    }

    /// Run `f` over the mutable bytes of this view
    pub(crate) fn with_bytes_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        self.region
            .write(|bytes| f(&mut bytes[self.offset..self.offset + self.length]))
    }

    /// Copy out the view contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.with_bytes(|bytes| bytes.to_vec())
    }

    /// Byte at `index`, if in range
    pub fn get(&self, index: usize) -> Option<u8> {
        if index < self.length {
            Some(self.with_bytes(|bytes| bytes[index]))
        } else {
            None
        }
    }

    /// Store a byte; out-of-range stores are ignored and return false
    pub fn set(&self, index: usize, value: u8) -> bool {
        if index < self.length {
            self.with_bytes_mut(|bytes| bytes[index] = value);
            true
        } else {
            false
        }
    }

    /// Aliasing window `[start, end)` with relative, clamped indices
    pub fn slice(&self, start: isize, end: isize) -> BufferView {
        let start = adjust_offset(start, self.length);
        let end = adjust_offset(end, self.length);
        let length = end.saturating_sub(start);
        BufferView::new(self.region.clone(), self.offset + start, length)
    }

    /// Aliasing window from `start` to the end of the view
    pub fn slice_from(&self, start: isize) -> BufferView {
        self.slice(start, self.length as isize)
    }

    /// Same as [`BufferView::slice`]
    #[inline]
    pub fn subarray(&self, start: isize, end: isize) -> BufferView {
        self.slice(start, end)
    }

    /// Independent copy in a new dedicated region
    pub fn copy_bytes(&self) -> BufferView {
        BufferView::over(MemoryRegion::from_vec(self.to_vec()))
    }

    /// Fill `[start, end)` by repeating `value`
    pub fn fill<'a>(
        &self,
        value: impl Into<FillValue<'a>>,
        start: usize,
        end: Option<usize>,
    ) -> BufferResult<&Self> {
        let end = end.unwrap_or(self.length);
        if start > self.length {
            return Err(BufferError::out_of_range(
                "offset",
                format!(">= 0 and <= {}", self.length),
                start.to_string(),
            ));
        }
        if end > self.length {
            return Err(BufferError::out_of_range(
                "end",
                format!(">= 0 and <= {}", self.length),
                end.to_string(),
            ));
        }

        let pattern = match value.into() {
            FillValue::Byte(b) => vec![b],
            FillValue::Str(s, encoding) => {
                let encoded = string::encode(s, encoding);
                if encoded.is_empty() {
                    if !s.is_empty() {
                        return Err(BufferError::invalid_arg_value(
                            "value",
                            "is invalid",
                            format!("'{}'", s),
                        ));
                    }
                    vec![0]
                } else {
                    encoded
                }
            }
            FillValue::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(BufferError::invalid_arg_value(
                        "value",
                        "is invalid",
                        "an empty buffer",
                    ));
                }
                bytes.to_vec()
            }
        };

        if start < end {
            self.with_bytes_mut(|bytes| {
                for (dst, src) in bytes[start..end].iter_mut().zip(pattern.iter().cycle()) {
                    *dst = *src;
                }
            });
        }
        Ok(self)
    }

    /// Copy `self[source_start..source_end]` into `target` at `target_start`
    ///
    /// Returns the number of bytes copied. Overlapping views of the same
    /// region copy as if through an intermediate buffer.
    pub fn copy(
        &self,
        target: &BufferView,
        target_start: usize,
        source_start: usize,
        source_end: Option<usize>,
    ) -> BufferResult<usize> {
        let source_end = source_end.unwrap_or(self.length);
        if target_start >= target.length || source_start >= source_end {
            return Ok(0);
        }
        if source_start > self.length {
            return Err(BufferError::out_of_range(
                "sourceStart",
                format!(">= 0 && <= {}", self.length),
                source_start.to_string(),
            ));
        }

        let count = (source_end - source_start)
            .min(target.length - target_start)
            .min(self.length - source_start);
        let src = self.offset + source_start;
        let dst = target.offset + target_start;

        if self.shares_memory_with(target) {
            self.region
                .write(|bytes| bytes.copy_within(src..src + count, dst));
        } else {
            let chunk = self.region.read(|bytes| bytes[src..src + count].to_vec());
            target
                .region
                .write(|bytes| bytes[dst..dst + count].copy_from_slice(&chunk));
        }
        Ok(count)
    }

    fn swap_lanes(&self, lane: usize) -> BufferResult<&Self> {
        if self.length % lane != 0 {
            return Err(BufferError::InvalidBufferSize((lane * 8) as u8));
        }
        self.with_bytes_mut(|bytes| {
            for chunk in bytes.chunks_exact_mut(lane) {
                chunk.reverse();
            }
        });
        Ok(self)
    }

    /// Reverse byte order of each 16-bit lane in place
    pub fn swap16(&self) -> BufferResult<&Self> {
        self.swap_lanes(2)
    }

    /// Reverse byte order of each 32-bit lane in place
    pub fn swap32(&self) -> BufferResult<&Self> {
        self.swap_lanes(4)
    }

    /// Reverse byte order of each 64-bit lane in place
    pub fn swap64(&self) -> BufferResult<&Self> {
        self.swap_lanes(8)
    }

    fn needle_bytes(needle: Needle<'_>, encoding: Encoding) -> Vec<u8> {
        match needle {
            Needle::Byte(b) => vec![b],
            Needle::Str(s) => string::encode(s, encoding),
            Needle::Bytes(bytes) => bytes.to_vec(),
        }
    }

    /// First index of `needle` at or after `byte_offset` (negative counts from the end)
    pub fn index_of<'a>(
        &self,
        needle: impl Into<Needle<'a>>,
        byte_offset: Option<isize>,
        encoding: Encoding,
    ) -> Option<usize> {
        let needle = Self::needle_bytes(needle.into(), encoding);
        let len = self.length as isize;
        let start = match byte_offset.unwrap_or(0) {
            o if o < 0 => (len + o).max(0),
            o => o,
        };

        if needle.is_empty() {
            return Some(start.min(len) as usize);
        }
        if start >= len {
            return None;
        }

        let start = start as usize;
        self.with_bytes(|hay| {
            hay[start..]
                .windows(needle.len())
                .position(|window| window == needle.as_slice())
                .map(|pos| pos + start)
        })
    }

    /// Last index of `needle` at or before `byte_offset` (negative counts from the end)
    pub fn last_index_of<'a>(
        &self,
        needle: impl Into<Needle<'a>>,
        byte_offset: Option<isize>,
        encoding: Encoding,
    ) -> Option<usize> {
        let needle = Self::needle_bytes(needle.into(), encoding);
        let len = self.length as isize;
        let start = match byte_offset.unwrap_or(len) {
            o if o < 0 => len + o,
            o => o,
        };
        if start < 0 {
            return None;
        }
        if needle.is_empty() {
            return Some(start.min(len) as usize);
        }

        let last_fit = len - needle.len() as isize;
        if last_fit < 0 {
            return None;
        }
        let start = start.min(last_fit) as usize;
        self.with_bytes(|hay| {
            (0..=start)
                .rev()
                .find(|&i| hay[i..i + needle.len()] == needle[..])
        })
    }

    /// Check whether `needle` occurs at or after `byte_offset`
    pub fn includes<'a>(
        &self,
        needle: impl Into<Needle<'a>>,
        byte_offset: Option<isize>,
        encoding: Encoding,
    ) -> bool {
        self.index_of(needle, byte_offset, encoding).is_some()
    }

    /// Debug rendering: `<Buffer 01 02 ... N more bytes>`
    pub fn inspect(&self) -> String {
        let max = config().inspect_max_bytes;
        let shown = self.with_bytes(|bytes| {
            bytes[..bytes.len().min(max)]
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        });

        let mut out = format!("<Buffer {}", shown);
        if self.length > max {
            let remaining = self.length - max;
            let plural = if remaining > 1 { "s" } else { "" };
            out.push_str(&format!(" ... {} more byte{}", remaining, plural));
        }
        out.push('>');
        out
    }
}

impl fmt::Debug for BufferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl fmt::Display for BufferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode(Encoding::Utf8))
    }
}
