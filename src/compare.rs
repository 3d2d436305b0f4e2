/*!
 * Byte-wise Comparison
 *
 * Lexicographic ordering over view contents. A proper prefix orders first,
 * so empty ranges compare as shorter.
 */

use std::cmp::Ordering;

use crate::core::errors::{BufferError, BufferResult};
use crate::memory::BufferView;

/// Check whether two views hold the same bytes
pub fn equals(a: &BufferView, b: &BufferView) -> bool {
    a.len() == b.len() && compare(a, b) == Ordering::Equal
}

/// Total order over view contents
pub fn compare(a: &BufferView, b: &BufferView) -> Ordering {
    a.with_bytes(|left| b.with_bytes(|right| left.cmp(right)))
}

fn check_end(name: &str, value: Option<usize>, len: usize) -> BufferResult<usize> {
    match value {
        None => Ok(len),
        Some(v) if v <= len => Ok(v),
        Some(v) => Err(BufferError::out_of_range(
            name,
            format!(">= 0 and <= {}", len),
            v.to_string(),
        )),
    }
}

fn check_start(name: &str, value: Option<usize>, len: usize) -> BufferResult<usize> {
    let v = value.unwrap_or(0);
    if v > len {
        return Err(BufferError::out_of_range(
            name,
            format!("<= {}", len),
            v.to_string(),
        ));
    }
    Ok(v)
}

impl BufferView {
    pub fn equals(&self, other: &BufferView) -> bool {
        equals(self, other)
    }

    /// Compare `self[source_start..source_end]` with `target[target_start..target_end]`
    ///
    /// Missing bounds default to the whole view. An empty source range orders
    /// before a non-empty target range and equal to an empty one.
    pub fn compare_range(
        &self,
        target: &BufferView,
        target_start: Option<usize>,
        target_end: Option<usize>,
        source_start: Option<usize>,
        source_end: Option<usize>,
    ) -> BufferResult<Ordering> {
        let target_end = check_end("targetEnd", target_end, target.len())?;
        let source_end = check_end("sourceEnd", source_end, self.len())?;
        let target_start = target_start.unwrap_or(0);
        let source_start = source_start.unwrap_or(0);

        if source_start >= source_end {
            return Ok(if target_start >= target_end {
                Ordering::Equal
            } else {
                Ordering::Less
            });
        }
        if target_start >= target_end {
            return Ok(Ordering::Greater);
        }

        let source_start = check_start("sourceStart", Some(source_start), self.len())?;
        let target_start = check_start("targetStart", Some(target_start), target.len())?;
        Ok(self.with_bytes(|source| {
            target.with_bytes(|dest| {
                source[source_start..source_end].cmp(&dest[target_start..target_end])
            })
        }))
    }
}

impl PartialEq for BufferView {
    fn eq(&self, other: &Self) -> bool {
        equals(self, other)
    }
}

impl Eq for BufferView {}

impl PartialOrd for BufferView {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BufferView {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}
