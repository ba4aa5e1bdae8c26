//! Growable contiguous buffer of POD elements.
//!
//! Elements live in one [`Block`] of the owner allocator, packed without
//! padding. Reads and writes go through [`bytemuck`] so the block needs no
//! particular alignment.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bumpkit_core::{AllocError, Allocator, Block};
use bytemuck::Pod;

/// Smallest capacity a buffer ever grows to.
const MIN_CAPACITY: usize = 4;

/// A dynamically sized sequence of `T` stored in allocator memory.
///
/// The buffer starts absent: no block, no owner. The first growth captures
/// the allocator passed to that call as the owner, and every later growth
/// goes through the owner regardless of the handle passed in. Growth
/// doubles the capacity (minimum 4), so `count <= allocated` always holds
/// and `allocated` never shrinks.
///
/// Nothing is released on drop. Call [`release`](Self::release) to hand the
/// block back to the owner.
pub struct GrowableBuffer<T> {
    owner: Allocator,
    block: Block,
    count: usize,
    allocated: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> GrowableBuffer<T> {
    /// An absent buffer with no storage and no owner.
    pub fn new() -> Self {
        Self {
            owner: Allocator::unbound(),
            block: Block::EMPTY,
            count: 0,
            allocated: 0,
            _marker: PhantomData,
        }
    }

    /// A buffer with room for at least `capacity` elements (minimum 4),
    /// owned by `allocator`.
    pub fn with_capacity(allocator: &Allocator, capacity: usize) -> Result<Self, AllocError> {
        let mut buffer = Self::new();
        buffer.grow_to(allocator, capacity.max(MIN_CAPACITY))?;
        Ok(buffer)
    }

    /// Number of elements appended.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether no element has been appended.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of elements the current block can hold.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// The captured owner allocator, once the buffer has grown.
    pub fn owner(&self) -> Option<&Allocator> {
        self.owner.is_bound().then_some(&self.owner)
    }

    /// Reserve one zeroed slot at the end and return its index.
    ///
    /// Grows through the owner if the buffer is full. `allocator` is used
    /// only when the buffer has no owner yet.
    pub fn append(&mut self, allocator: &Allocator) -> Result<usize, AllocError> {
        if self.count == self.allocated {
            let target = if self.allocated == 0 {
                MIN_CAPACITY
            } else {
                self.allocated
                    .checked_mul(2)
                    .ok_or(AllocError::OutOfMemory {
                        requested: usize::MAX,
                    })?
            };
            self.grow_to(allocator, target)?;
        }
        let index = self.count;
        // Arena growth does not zero the fresh tail.
        let zero = T::zeroed();
        self.owner
            .write(&self.block, index * size_of::<T>(), bytemuck::bytes_of(&zero))?;
        self.count += 1;
        Ok(index)
    }

    /// Append `value` and return its index.
    pub fn push(&mut self, allocator: &Allocator, value: T) -> Result<usize, AllocError> {
        let index = self.append(allocator)?;
        self.set(index, value)?;
        Ok(index)
    }

    /// The element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Result<Option<T>, AllocError> {
        if index >= self.count {
            return Ok(None);
        }
        let offset = index * size_of::<T>();
        self.owner.with_bytes(&self.block, |bytes| {
            Some(bytemuck::pod_read_unaligned(
                &bytes[offset..offset + size_of::<T>()],
            ))
        })
    }

    /// Overwrite the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        assert!(
            index < self.count,
            "index {index} out of bounds for buffer of {} elements",
            self.count
        );
        self.owner
            .write(&self.block, index * size_of::<T>(), bytemuck::bytes_of(&value))
    }

    /// Read, modify and write back the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> Result<(), AllocError> {
        let mut value = self.get(index)?.unwrap_or_else(|| {
            panic!(
                "index {index} out of bounds for buffer of {} elements",
                self.count
            )
        });
        f(&mut value);
        self.set(index, value)
    }

    /// Copy the elements out into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<T>, AllocError> {
        let used = self.count * size_of::<T>();
        if size_of::<T>() == 0 {
            return Ok(vec![T::zeroed(); self.count]);
        }
        self.owner.with_bytes(&self.block, |bytes| {
            bytes[..used]
                .chunks_exact(size_of::<T>())
                .map(bytemuck::pod_read_unaligned)
                .collect()
        })
    }

    /// Iterate over a snapshot of the elements.
    pub fn iter(&self) -> Result<std::vec::IntoIter<T>, AllocError> {
        Ok(self.to_vec()?.into_iter())
    }

    /// Hand the block back to the owner. An absent buffer releases nothing.
    pub fn release(self) -> Result<(), AllocError> {
        if self.owner.is_bound() {
            self.owner.release(self.block)?;
        }
        Ok(())
    }

    fn grow_to(&mut self, allocator: &Allocator, capacity: usize) -> Result<(), AllocError> {
        if !self.owner.is_bound() {
            self.owner = allocator.clone();
        }
        let bytes = capacity
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::OutOfMemory {
                requested: usize::MAX,
            })?;
        self.block = self.owner.grow(self.block, bytes)?;
        tracing::trace!(
            from = self.allocated,
            to = capacity,
            source = self.owner.name(),
            "growable buffer grown"
        );
        self.allocated = capacity;
        Ok(())
    }
}

impl<T: Pod> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("owner", &self.owner)
            .field("count", &self.count)
            .field("allocated", &self.allocated)
            .finish()
    }
}
