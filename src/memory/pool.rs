/*!
 * Pool Allocation
 * Carves small unsafe allocations out of a shared arena
 */

use serde::Serialize;
use std::cell::RefCell;
use tracing::trace;

use super::region::MemoryRegion;
use super::view::BufferView;
use crate::core::config::{config, BufferConfig};
use crate::core::errors::{BufferError, BufferResult};
use crate::core::limits::{MAX_LENGTH, POOL_ALIGNMENT};

/// Allocation counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub pool_size: usize,
    pub pool_offset: usize,
    pub pools_created: u64,
    pub pools_recycled: u64,
    pub pooled_allocations: u64,
    pub dedicated_allocations: u64,
}

/// Decides whether a new view is carved from the shared arena or gets a
/// dedicated region
///
/// # Policy
///
/// - `alloc`: dedicated, zero-filled
/// - `alloc_unsafe`: arena-backed when `size < pool_size / 2`, dedicated otherwise
/// - `alloc_unsafe_slow`: always dedicated, `byte_offset() == 0`
///
/// Arena-backed views share one region. Once it cannot fit a request the
/// arena is rewound if no view still references it, and replaced otherwise.
/// A rewound arena keeps the bytes of earlier allocations, so unsafe
/// allocations make no promise about their contents unless `zero_fill` is
/// configured.
#[derive(Debug)]
pub struct PoolAllocator {
    pool_size: usize,
    zero_fill: bool,
    arena: Option<MemoryRegion>,
    offset: usize,
    stats: PoolStats,
}

impl Default for PoolAllocator {
    fn default() -> Self {
        Self::with_config(config())
    }
}

impl PoolAllocator {
    /// Allocator using the process-wide configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: &BufferConfig) -> Self {
        Self {
            pool_size: cfg.pool_size,
            zero_fill: cfg.zero_fill,
            arena: None,
            offset: 0,
            stats: PoolStats {
                pool_size: cfg.pool_size,
                ..PoolStats::default()
            },
        }
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    fn validate_size(size: usize) -> BufferResult<()> {
        if size > MAX_LENGTH {
            return Err(BufferError::out_of_range(
                "size",
                format!(">= 0 and <= {}", MAX_LENGTH),
                size.to_string(),
            ));
        }
        Ok(())
    }

    fn dedicated(&mut self, size: usize) -> BufferView {
        self.stats.dedicated_allocations += 1;
        trace!(size, "Dedicated allocation");
        BufferView::over(MemoryRegion::zeroed(size))
    }

    /// Dedicated, zero-filled allocation
    pub fn alloc(&mut self, size: usize) -> BufferResult<BufferView> {
        Self::validate_size(size)?;
        Ok(self.dedicated(size))
    }

    /// Possibly arena-backed allocation with unspecified contents
    pub fn alloc_unsafe(&mut self, size: usize) -> BufferResult<BufferView> {
        Self::validate_size(size)?;
        if size == 0 || size >= self.pool_size >> 1 {
            return Ok(self.dedicated(size));
        }

        let arena = match &self.arena {
            Some(arena) if size <= self.pool_size.saturating_sub(self.offset) => arena.clone(),
            _ => self.next_pool(),
        };

        let view = BufferView::new(arena, self.offset, size);
        if self.zero_fill {
            view.with_bytes_mut(|bytes| bytes.fill(0));
        }
        self.offset += size;
        self.align_pool();
        self.stats.pooled_allocations += 1;
        self.stats.pool_offset = self.offset;
        Ok(view)
    }

    /// Dedicated allocation with unspecified contents
    pub fn alloc_unsafe_slow(&mut self, size: usize) -> BufferResult<BufferView> {
        Self::validate_size(size)?;
        Ok(self.dedicated(size))
    }

    /// Copy `bytes` into an allocation chosen by the `alloc_unsafe` policy
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> BufferResult<BufferView> {
        let view = self.alloc_unsafe(bytes.len())?;
        view.with_bytes_mut(|dst| dst.copy_from_slice(bytes));
        Ok(view)
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.clone()
    }

    fn next_pool(&mut self) -> MemoryRegion {
        match &self.arena {
            // Only the allocator holds the handle: no live view can observe a rewind
            Some(arena) if arena.handle_count() == 1 => {
                let arena = arena.clone();
                trace!(region = arena.id(), "Recycled pool arena");
                self.offset = 0;
                self.stats.pools_recycled += 1;
                arena
            }
            _ => self.create_pool(),
        }
    }

    fn create_pool(&mut self) -> MemoryRegion {
        let arena = MemoryRegion::zeroed(self.pool_size);
        trace!(
            pool_size = self.pool_size,
            region = arena.id(),
            "Created pool arena"
        );
        self.arena = Some(arena.clone());
        self.offset = 0;
        self.stats.pools_created += 1;
        arena
    }

    fn align_pool(&mut self) {
        if self.offset % POOL_ALIGNMENT != 0 {
            self.offset = (self.offset | (POOL_ALIGNMENT - 1)) + 1;
        }
    }
}

thread_local! {
    static DEFAULT_POOL: RefCell<PoolAllocator> = RefCell::new(PoolAllocator::new());
}

/// Run `f` with this thread's default allocator
pub fn with_default_pool<F, R>(f: F) -> R
where
    F: FnOnce(&mut PoolAllocator) -> R,
{
    DEFAULT_POOL.with(|pool| f(&mut pool.borrow_mut()))
}
