/*!
 * Pool Allocation Tests
 */

use ai_os_buffer::{BufferConfig, BufferView, PoolAllocator};
use pretty_assertions::assert_eq;

fn pool() -> PoolAllocator {
    PoolAllocator::with_config(&BufferConfig::default())
}

#[test]
fn test_alloc_unsafe_slow_never_aliases() {
    let a = BufferView::alloc_unsafe_slow(10).unwrap();
    let b = BufferView::alloc_unsafe_slow(10).unwrap();
    assert!(!a.shares_memory_with(&b));
    assert_ne!(a.region(), b.region());
    assert_eq!(a.byte_offset(), 0);
    assert_eq!(b.byte_offset(), 0);
}

#[test]
fn test_alloc_is_zero_filled_and_dedicated() {
    let a = BufferView::alloc(16).unwrap();
    let b = BufferView::alloc(16).unwrap();
    assert_eq!(a.to_vec(), vec![0; 16]);
    assert!(!a.shares_memory_with(&b));
}

#[test]
fn test_small_unsafe_allocations_come_from_arena() {
    let mut pool = pool();
    let a = pool.alloc_unsafe(100).unwrap();
    let b = pool.alloc_unsafe(100).unwrap();
    assert!(a.shares_memory_with(&b));
    assert_eq!(a.byte_offset(), 0);
    assert_eq!(b.byte_offset(), 104);
    assert_eq!(a.region().capacity(), 8192);

    // Writes stay inside each window
    a.fill(0xAAu8, 0, None).unwrap();
    b.fill(0xBBu8, 0, None).unwrap();
    assert!(a.to_vec().iter().all(|&x| x == 0xAA));
}

#[test]
fn test_half_pool_threshold() {
    let mut pool = pool();
    let below = pool.alloc_unsafe(4095).unwrap();
    let at = pool.alloc_unsafe(4096).unwrap();
    assert_eq!(below.region().capacity(), 8192);
    assert_eq!(at.region().capacity(), 4096);

    let stats = pool.stats();
    assert_eq!(stats.pooled_allocations, 1);
    assert_eq!(stats.dedicated_allocations, 1);
    assert_eq!(stats.pool_offset, 4096);
}

#[test]
fn test_stats_serialize() {
    let mut pool = pool();
    pool.alloc_unsafe(8).unwrap();
    let json = serde_json::to_value(pool.stats()).unwrap();
    assert_eq!(json["pools_created"], 1);
    assert_eq!(json["pool_size"], 8192);
}
