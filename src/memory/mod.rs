/*!
 * Memory Module
 * Backing storage, aliasable views and pooled allocation
 */

pub mod pool;
pub mod region;
pub mod simd;
pub mod view;

// Re-export for convenience
pub use pool::{with_default_pool, PoolAllocator, PoolStats};
pub use region::MemoryRegion;
pub use simd::{capabilities, init_simd, is_ascii, SimdCapabilities};
pub use view::{BufferView, FillValue, Needle};
