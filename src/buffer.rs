/*!
 * Buffer Statics
 *
 * Allocation entry points backed by the thread's default pool, plus the
 * view-independent helpers (`concat`, `byte_length`, classification,
 * transcoding) and the JSON form `{"type":"Buffer","data":[...]}`.
 */

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::codec::encoding::Encoding;
use crate::codec::{string, utf8};
use crate::compare;
use crate::core::errors::{BufferError, BufferResult};
use crate::memory::{with_default_pool, BufferView, FillValue};

const JSON_TYPE_TAG: &str = "Buffer";

#[derive(Serialize, Deserialize)]
struct BufferJson {
    #[serde(rename = "type")]
    kind: String,
    data: Vec<u8>,
}

impl BufferView {
    /// Zero-filled view of `size` bytes
    pub fn alloc(size: usize) -> BufferResult<BufferView> {
        with_default_pool(|pool| pool.alloc(size))
    }

    /// View of `size` bytes filled by repeating `fill`
    pub fn alloc_filled<'a>(size: usize, fill: impl Into<FillValue<'a>>) -> BufferResult<BufferView> {
        let view = BufferView::alloc(size)?;
        view.fill(fill, 0, None)?;
        Ok(view)
    }

    /// View of `size` bytes, possibly carved from the shared arena
    pub fn alloc_unsafe(size: usize) -> BufferResult<BufferView> {
        with_default_pool(|pool| pool.alloc_unsafe(size))
    }

    /// View of `size` bytes in a dedicated region
    pub fn alloc_unsafe_slow(size: usize) -> BufferResult<BufferView> {
        with_default_pool(|pool| pool.alloc_unsafe_slow(size))
    }

    /// Join `list` into one new view
    ///
    /// With `total_length`, the result is exactly that long: inputs are
    /// truncated or the tail is zero-padded.
    pub fn concat(list: &[BufferView], total_length: Option<usize>) -> BufferResult<BufferView> {
        if list.is_empty() {
            return BufferView::alloc(0);
        }
        let total = total_length.unwrap_or_else(|| list.iter().map(BufferView::len).sum());
        let target = BufferView::alloc_unsafe(total)?;

        let mut position = 0;
        for item in list {
            if position >= total {
                break;
            }
            position += item.copy(&target, position, 0, None)?;
        }
        if position < total {
            target.fill(0u8, position, None)?;
        }
        Ok(target)
    }

    /// Number of bytes `s` encodes to
    pub fn byte_length(s: &str, encoding: Encoding) -> usize {
        string::byte_length(s, encoding)
    }

    pub fn is_encoding(name: &str) -> bool {
        Encoding::is_encoding(name)
    }

    /// `a.compare(b)` as a free function, for sorting
    pub fn compare(a: &BufferView, b: &BufferView) -> Ordering {
        compare::compare(a, b)
    }

    pub fn is_utf8(&self) -> bool {
        self.with_bytes(utf8::is_utf8)
    }

    pub fn is_ascii(&self) -> bool {
        self.with_bytes(utf8::is_ascii)
    }

    /// Re-encode `source` into a new view
    pub fn transcode(source: &BufferView, from: Encoding, to: Encoding) -> BufferResult<BufferView> {
        let bytes = string::transcode_bytes(&source.to_vec(), from, to)?;
        BufferView::from_bytes(&bytes)
    }

    /// JSON form `{"type":"Buffer","data":[...]}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": JSON_TYPE_TAG,
            "data": self.to_vec(),
        })
    }

    /// Rebuild a view from its JSON form
    pub fn from_json(json: &str) -> BufferResult<BufferView> {
        serde_json::from_str::<BufferView>(json).map_err(|e| {
            BufferError::invalid_arg_value("json", "must be a serialized Buffer", e.to_string())
        })
    }
}

impl Serialize for BufferView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BufferJson {
            kind: JSON_TYPE_TAG.to_string(),
            data: self.to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BufferView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = BufferJson::deserialize(deserializer)?;
        if json.kind != JSON_TYPE_TAG {
            return Err(de::Error::custom(format!(
                "expected type \"{}\", found \"{}\"",
                JSON_TYPE_TAG, json.kind
            )));
        }
        BufferView::from_bytes(&json.data).map_err(de::Error::custom)
    }
}
