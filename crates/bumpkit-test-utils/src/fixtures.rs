//! Reusable allocator and context fixtures.
//!
//! - [`heap`]: an unbounded heap allocator handle.
//! - [`bounded_heap`]: a heap that refuses to hold more than a byte budget.
//! - [`arena`]: a standalone arena plus its allocator handle.
//! - [`context`]: an execution context over a fresh heap.

use bumpkit_arena::{Arena, ExecutionContext, SharedArena};
use bumpkit_core::{Allocator, HeapAllocator, HeapConfig};

/// Scratch capacity used by [`context`].
pub const TEST_SCRATCH_SIZE: usize = 64 * 1024;

pub fn heap() -> Allocator {
    Allocator::new(HeapAllocator::new())
}

/// A heap capped at `limit` live bytes.
///
/// # Panics
///
/// Panics if `limit` is zero.
pub fn bounded_heap(limit: usize) -> Allocator {
    let heap = HeapAllocator::with_config(&HeapConfig::with_limit(limit))
        .expect("test heap limit must be non-zero");
    Allocator::new(heap)
}

/// A standalone arena of `capacity` bytes and a handle routed to it.
pub fn arena(capacity: usize) -> (SharedArena, Allocator) {
    let shared = Arena::new(capacity)
        .expect("test arena reservation failed")
        .into_shared();
    let alloc = Arena::allocator(&shared);
    (shared, alloc)
}

/// An execution context over a fresh heap with [`TEST_SCRATCH_SIZE`]
/// scratch arenas.
pub fn context() -> ExecutionContext {
    ExecutionContext::new(heap(), TEST_SCRATCH_SIZE).expect("test context creation failed")
}
