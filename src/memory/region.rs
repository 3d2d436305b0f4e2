/*!
 * Memory Regions
 * Fixed-capacity byte storage shared by every view carved from it
 */

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_REGION_ID: AtomicU64 = AtomicU64::new(1);

/// Contiguous, fixed-capacity byte allocation
///
/// Cloning a region clones the handle, not the bytes: every clone observes
/// the same storage. The allocation is released when the last handle drops.
///
/// Byte access goes through views; the lock-holding closures stay inside
/// the crate so callers cannot nest an allocation inside a read.
#[derive(Clone)]
pub struct MemoryRegion {
    inner: Arc<RegionInner>,
}

struct RegionInner {
    id: u64,
    capacity: usize,
    bytes: RwLock<Box<[u8]>>,
}

impl MemoryRegion {
    /// Allocate a zero-filled region
    pub fn zeroed(capacity: usize) -> Self {
        Self::from_vec(vec![0u8; capacity])
    }

    /// Take ownership of existing bytes; capacity is their length
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let bytes = bytes.into_boxed_slice();
        Self {
            inner: Arc::new(RegionInner {
                id: NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed),
                capacity: bytes.len(),
                bytes: RwLock::new(bytes),
            }),
        }
    }

    /// Unique identity of the allocation
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Check whether two handles refer to the same allocation
    #[inline]
    pub fn ptr_eq(&self, other: &MemoryRegion) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles (views and regions) to this allocation
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Read the whole region
    ///
    /// Read access nests, so callers may read two views of the same region
    /// at once. Do not call `write` on the same region from inside `f`.
    pub(crate) fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        let guard = self.inner.bytes.read_recursive();
        f(&guard)
    }

    /// Mutate the whole region
    pub(crate) fn write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let mut guard = self.inner.bytes.write();
        f(&mut guard)
    }

    /// Copy out the region contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.read(|bytes| bytes.to_vec())
    }
}

impl PartialEq for MemoryRegion {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for MemoryRegion {}

impl fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRegion")
            .field("id", &self.inner.id)
            .field("capacity", &self.inner.capacity)
            .finish()
    }
}
