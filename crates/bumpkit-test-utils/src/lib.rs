//! Test utilities and mock types for bumpkit development.
//!
//! Provides a call-counting [`CountingSource`] and a [`FailingSource`]
//! that refuses allocations after a set number of calls, plus the
//! [`fixtures`] used across the workspace's integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use bumpkit_core::{AllocError, Allocator, Block, HeapAllocator, MemorySource};

/// Number of calls a mock source has seen, per operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub allocate: usize,
    pub grow: usize,
    pub release: usize,
}

/// A heap-backed source that counts every allocate, grow and release.
///
/// Use [`CountingSource::shared`] to keep a typed reference for
/// inspection after handing the allocator to code under test.
#[derive(Debug, Default)]
pub struct CountingSource {
    heap: HeapAllocator,
    counts: CallCounts,
    /// Sizes passed to `allocate` and `grow`, in call order.
    requests: Vec<usize>,
}

impl CountingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh source plus an allocator routed to it.
    pub fn shared() -> (Rc<RefCell<Self>>, Allocator) {
        let source = Rc::new(RefCell::new(Self::new()));
        let alloc = Allocator::from_shared(Rc::clone(&source));
        (source, alloc)
    }

    pub fn counts(&self) -> CallCounts {
        self.counts
    }

    /// Sizes requested so far through `allocate` and `grow`.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Bytes held by live allocations.
    pub fn live_bytes(&self) -> usize {
        self.heap.live_bytes()
    }
}

impl MemorySource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn allocate(&mut self, size: usize) -> Result<Block, AllocError> {
        self.counts.allocate += 1;
        self.requests.push(size);
        self.heap.allocate(size)
    }

    fn grow(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        self.counts.grow += 1;
        self.requests.push(new_size);
        self.heap.grow(block, new_size)
    }

    fn release(&mut self, block: Block) -> Result<(), AllocError> {
        self.counts.release += 1;
        self.heap.release(block)
    }

    fn bytes(&self, block: &Block) -> Result<&[u8], AllocError> {
        self.heap.bytes(block)
    }

    fn bytes_mut(&mut self, block: &Block) -> Result<&mut [u8], AllocError> {
        self.heap.bytes_mut(block)
    }
}

/// A source that fails deterministically once `budget` allocate/grow
/// calls have succeeded.
///
/// Failures report [`AllocError::OutOfMemory`], the same way the heap
/// reports a refused reservation.
#[derive(Debug)]
pub struct FailingSource {
    heap: HeapAllocator,
    budget: usize,
    calls: usize,
}

impl FailingSource {
    pub fn new(budget: usize) -> Self {
        Self {
            heap: HeapAllocator::new(),
            budget,
            calls: 0,
        }
    }

    fn spend(&mut self, requested: usize) -> Result<(), AllocError> {
        if self.calls >= self.budget {
            return Err(AllocError::OutOfMemory { requested });
        }
        self.calls += 1;
        Ok(())
    }
}

impl MemorySource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn allocate(&mut self, size: usize) -> Result<Block, AllocError> {
        self.spend(size)?;
        self.heap.allocate(size)
    }

    fn grow(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        self.spend(new_size)?;
        self.heap.grow(block, new_size)
    }

    fn release(&mut self, block: Block) -> Result<(), AllocError> {
        self.heap.release(block)
    }

    fn bytes(&self, block: &Block) -> Result<&[u8], AllocError> {
        self.heap.bytes(block)
    }

    fn bytes_mut(&mut self, block: &Block) -> Result<&mut [u8], AllocError> {
        self.heap.bytes_mut(block)
    }
}
