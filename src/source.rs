/*!
 * Construction Sources
 *
 * Inputs a view can be built from are classified once into a [`BufferSource`]
 * and then materialized. Only [`BufferSource::Region`] aliases existing
 * memory; every other source is copied into a fresh allocation.
 */

use crate::codec::encoding::Encoding;
use crate::codec::string;
use crate::core::errors::{BufferError, BufferResult};
use crate::core::value::JsValue;
use crate::memory::{with_default_pool, BufferView, MemoryRegion};

/// Element type of a [`TypedArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

impl ElementKind {
    pub fn bytes_per_element(&self) -> usize {
        match self {
            ElementKind::Uint8 | ElementKind::Int8 => 1,
            ElementKind::Uint16 | ElementKind::Int16 => 2,
            ElementKind::Uint32 | ElementKind::Int32 | ElementKind::Float32 => 4,
            ElementKind::Float64 | ElementKind::BigInt64 | ElementKind::BigUint64 => 8,
        }
    }
}

/// Typed element storage, laid out little-endian when viewed as bytes
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Uint8(Vec<u8>),
    Int8(Vec<i8>),
    Uint16(Vec<u16>),
    Int16(Vec<i16>),
    Uint32(Vec<u32>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    BigInt64(Vec<i64>),
    BigUint64(Vec<u64>),
}

macro_rules! le_bytes {
    ($items:expr) => {
        $items.iter().flat_map(|v| v.to_le_bytes()).collect()
    };
}

impl TypedArray {
    pub fn kind(&self) -> ElementKind {
        match self {
            TypedArray::Uint8(_) => ElementKind::Uint8,
            TypedArray::Int8(_) => ElementKind::Int8,
            TypedArray::Uint16(_) => ElementKind::Uint16,
            TypedArray::Int16(_) => ElementKind::Int16,
            TypedArray::Uint32(_) => ElementKind::Uint32,
            TypedArray::Int32(_) => ElementKind::Int32,
            TypedArray::Float32(_) => ElementKind::Float32,
            TypedArray::Float64(_) => ElementKind::Float64,
            TypedArray::BigInt64(_) => ElementKind::BigInt64,
            TypedArray::BigUint64(_) => ElementKind::BigUint64,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Uint8(v) => v.len(),
            TypedArray::Int8(v) => v.len(),
            TypedArray::Uint16(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Uint32(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
            TypedArray::BigInt64(v) => v.len(),
            TypedArray::BigUint64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn byte_len(&self) -> usize {
        self.len() * self.kind().bytes_per_element()
    }

    /// Raw element bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            TypedArray::Uint8(v) => v.clone(),
            TypedArray::Int8(v) => v.iter().map(|&b| b as u8).collect(),
            TypedArray::Uint16(v) => le_bytes!(v),
            TypedArray::Int16(v) => le_bytes!(v),
            TypedArray::Uint32(v) => le_bytes!(v),
            TypedArray::Int32(v) => le_bytes!(v),
            TypedArray::Float32(v) => le_bytes!(v),
            TypedArray::Float64(v) => le_bytes!(v),
            TypedArray::BigInt64(v) => le_bytes!(v),
            TypedArray::BigUint64(v) => le_bytes!(v),
        }
    }
}

/// Classified construction input
#[derive(Debug, Clone)]
pub enum BufferSource<'a> {
    /// Raw bytes, copied
    Bytes(&'a [u8]),
    /// Another view, copied
    View(&'a BufferView),
    /// Array-like of loosely typed values, each reduced modulo 256
    Values(&'a [JsValue]),
    /// Text in an encoding
    Text(&'a str, Encoding),
    /// Typed array, one byte per element (values reduced modulo 256)
    Typed(&'a TypedArray),
    /// Existing region, aliased
    Region {
        region: &'a MemoryRegion,
        offset: Option<usize>,
        length: Option<usize>,
    },
}

impl<'a> BufferSource<'a> {
    /// Classify a loosely typed value
    ///
    /// Strings decode as UTF-8 and arrays as element values. Objects go
    /// through their primitive when it is a string or array. Anything else is
    /// rejected.
    pub fn classify(value: &'a JsValue) -> BufferResult<Self> {
        match value {
            JsValue::String(s) => Ok(BufferSource::Text(s, Encoding::Utf8)),
            JsValue::Array(items) => Ok(BufferSource::Values(items)),
            JsValue::Object(obj) => match obj.primitive() {
                Some(inner @ (JsValue::String(_) | JsValue::Array(_))) => Self::classify(inner),
                _ => Err(unsupported_source(value)),
            },
            other => Err(unsupported_source(other)),
        }
    }
}

fn unsupported_source(value: &JsValue) -> BufferError {
    BufferError::Coercion(format!(
        "The first argument must be of type string or an instance of Buffer, \
         ArrayBuffer, or Array or an Array-like Object. Received {}",
        value.describe()
    ))
}

/// ToUint8: truncate, wrap modulo 256, non-finite becomes 0
fn to_uint8(n: f64) -> u8 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(256.0) as u8
}

fn typed_element_bytes(typed: &TypedArray, start: usize, end: usize) -> Vec<u8> {
    match typed {
        TypedArray::Uint8(v) => v[start..end].to_vec(),
        TypedArray::Int8(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::Uint16(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::Int16(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::Uint32(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::Int32(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::Float32(v) => v[start..end].iter().map(|&x| to_uint8(x as f64)).collect(),
        TypedArray::Float64(v) => v[start..end].iter().map(|&x| to_uint8(x)).collect(),
        TypedArray::BigInt64(v) => v[start..end].iter().map(|&x| x as u8).collect(),
        TypedArray::BigUint64(v) => v[start..end].iter().map(|&x| x as u8).collect(),
    }
}

impl BufferView {
    /// Materialize a classified source
    pub fn from_source(source: BufferSource<'_>) -> BufferResult<BufferView> {
        match source {
            BufferSource::Bytes(bytes) => BufferView::from_bytes(bytes),
            // Snapshot first: the source may live in the arena being carved
            BufferSource::View(view) => BufferView::from_bytes(&view.to_vec()),
            BufferSource::Values(values) => BufferView::from_values(values),
            BufferSource::Text(s, encoding) => BufferView::from_string(s, encoding),
            BufferSource::Typed(typed) => {
                BufferView::from_bytes(&typed_element_bytes(typed, 0, typed.len()))
            }
            BufferSource::Region {
                region,
                offset,
                length,
            } => BufferView::from_region(region, offset, length),
        }
    }

    /// Build a view from any loosely typed value
    pub fn from_value(value: &JsValue) -> BufferResult<BufferView> {
        BufferView::from_source(BufferSource::classify(value)?)
    }

    /// Copy of raw bytes
    pub fn from_bytes(bytes: &[u8]) -> BufferResult<BufferView> {
        with_default_pool(|pool| pool.alloc_copy(bytes))
    }

    /// Copy of an array-like, each element converted and reduced modulo 256
    pub fn from_values(values: &[JsValue]) -> BufferResult<BufferView> {
        let bytes = values
            .iter()
            .map(|v| v.to_number().map(to_uint8))
            .collect::<BufferResult<Vec<u8>>>()?;
        BufferView::from_bytes(&bytes)
    }

    /// Encode `s` into a new view
    pub fn from_string(s: &str, encoding: Encoding) -> BufferResult<BufferView> {
        BufferView::from_bytes(&string::encode(s, encoding))
    }

    /// Aliasing view over `region[offset..offset + length]`
    ///
    /// `offset` defaults to 0 and `length` to the rest of the region. A zero
    /// length yields an empty view.
    pub fn from_region(
        region: &MemoryRegion,
        offset: Option<usize>,
        length: Option<usize>,
    ) -> BufferResult<BufferView> {
        let offset = offset.unwrap_or(0);
        if offset > region.capacity() {
            return Err(BufferError::BufferOutOfBounds {
                name: Some("offset".to_string()),
            });
        }
        let max_length = region.capacity() - offset;
        let length = match length {
            None => max_length,
            Some(l) if l > max_length => {
                return Err(BufferError::BufferOutOfBounds {
                    name: Some("length".to_string()),
                })
            }
            Some(l) => l,
        };
        Ok(BufferView::new(region.clone(), offset, length))
    }

    /// Copy the elements `[offset, offset + length)` of a typed array
    ///
    /// Offset and length count elements, not bytes. The copy never aliases
    /// the source.
    pub fn copy_bytes_from(
        typed: &TypedArray,
        offset: Option<usize>,
        length: Option<usize>,
    ) -> BufferResult<BufferView> {
        let count = typed.len();
        let start = offset.unwrap_or(0);
        if count == 0 || start >= count {
            return BufferView::from_bytes(&[]);
        }
        let end = length.map_or(count, |l| start.saturating_add(l).min(count));
        let bytes_per_element = typed.kind().bytes_per_element();
        let raw = typed.to_bytes();
        BufferView::from_bytes(&raw[start * bytes_per_element..end * bytes_per_element])
    }
}
