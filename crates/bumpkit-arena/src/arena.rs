//! Fixed-capacity bump region.
//!
//! An [`Arena`] is a pre-allocated `Vec<u8>` with a cursor that only moves
//! forward on allocation. Individual blocks are never freed; the cursor is
//! reset to zero by [`Arena::clear`] or rolled back to a saved mark by a
//! [`ScratchScope`](crate::ScratchScope).

use std::cell::RefCell;
use std::rc::Rc;

use bumpkit_core::{try_zeroed, AllocError, Allocator, Block, MemorySource};
use smallvec::SmallVec;

/// Alignment, in bytes, of every block offset handed out by an arena.
pub const ALIGNMENT: usize = 8;

const NAME: &str = "arena";

/// An arena shared between its owner and the allocator handles built on it.
pub type SharedArena = Rc<RefCell<Arena>>;

/// A bump allocator over a fixed block of bytes.
///
/// Allocation rounds the cursor up to the next multiple of [`ALIGNMENT`]
/// and reserves the requested bytes from there. Requests that would run
/// past the capacity fail with [`AllocError::CapacityExceeded`] and leave
/// the cursor untouched.
///
/// Offsets are aligned relative to the start of the arena's storage.
#[derive(Debug)]
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    storage: Vec<u8>,
    /// Bump pointer: bytes occupied so far, padding included.
    occupied: usize,
    /// Saved cursors of the scratch scopes open on this arena, innermost last.
    open_scopes: SmallVec<[usize; 4]>,
}

impl Arena {
    /// Create an arena with `capacity` zeroed bytes.
    ///
    /// Fails with [`AllocError::OutOfMemory`] if the backing storage cannot
    /// be reserved.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self::from_memory(try_zeroed(capacity)?))
    }

    /// Create an arena over caller-provided memory. The capacity is the
    /// length of `memory`.
    pub fn from_memory(memory: Vec<u8>) -> Self {
        Self {
            storage: memory,
            occupied: 0,
            open_scopes: SmallVec::new(),
        }
    }

    /// Wrap the arena for use through [`Allocator`] handles.
    pub fn into_shared(self) -> SharedArena {
        Rc::new(RefCell::new(self))
    }

    /// An allocator handle routed to `arena`.
    pub fn allocator(arena: &SharedArena) -> Allocator {
        Allocator::from_shared(Rc::clone(arena))
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes occupied so far, alignment padding included.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Bytes not yet occupied.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.occupied
    }

    /// Number of scratch scopes currently open on this arena.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes.len()
    }

    /// Bump-allocate `size` bytes at the next aligned offset.
    pub fn alloc(&mut self, size: usize) -> Result<Block, AllocError> {
        let start = align_up(self.occupied)
            .filter(|&start| start <= self.storage.len())
            .ok_or(AllocError::CapacityExceeded {
                requested: size,
                remaining: 0,
            })?;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.storage.len())
            .ok_or(AllocError::CapacityExceeded {
                requested: size,
                remaining: self.storage.len() - start,
            })?;
        self.occupied = end;
        Ok(Block::new(start, size))
    }

    /// Grow `block` to `new_size` bytes.
    ///
    /// A request that does not grow returns `block` unchanged; the bytes
    /// past `new_size` stay in place but are logically dead.
    ///
    /// The most recent block is extended in place when it ends at the
    /// cursor and no scratch scope was opened after it. Otherwise a fresh
    /// block is allocated and the old bytes are copied forward; the old
    /// region is not reclaimed until the arena is cleared.
    pub fn realloc(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        if new_size <= block.len() {
            return Ok(block);
        }
        let range = self.check(&block)?;
        let after_marks = self
            .open_scopes
            .last()
            .is_none_or(|&mark| mark <= range.start);
        if !block.is_empty() && range.end == self.occupied && after_marks {
            let end = range
                .start
                .checked_add(new_size)
                .filter(|&end| end <= self.storage.len())
                .ok_or(AllocError::CapacityExceeded {
                    requested: new_size - block.len(),
                    remaining: self.storage.len() - self.occupied,
                })?;
            self.occupied = end;
            return Ok(Block::new(range.start, new_size));
        }
        let grown = self.alloc(new_size)?;
        let old = block.key()..block.key() + block.len();
        self.storage.copy_within(old, grown.key());
        Ok(grown)
    }

    /// Reset the cursor to zero, invalidating every block handed out.
    ///
    /// The backing memory is NOT zeroed.
    pub fn clear(&mut self) {
        self.occupied = 0;
    }

    /// Record a scratch checkpoint. Returns the saved cursor and the
    /// nesting depth the scope must close at.
    pub(crate) fn push_scope(&mut self) -> (usize, usize) {
        let depth = self.open_scopes.len();
        self.open_scopes.push(self.occupied);
        (self.occupied, depth)
    }

    /// Close the checkpoint opened at `depth`, rolling the cursor back to
    /// `saved`.
    ///
    /// # Panics
    ///
    /// Panics if the checkpoint is not the innermost open scope, or if the
    /// cursor fell below `saved` (the arena was cleared or rolled back past
    /// this scope while it was open).
    pub(crate) fn pop_scope(&mut self, saved: usize, depth: usize) {
        assert_eq!(
            self.open_scopes.len(),
            depth + 1,
            "scratch scope closed out of order: scope at depth {depth} ended while {} scopes are open",
            self.open_scopes.len(),
        );
        assert!(
            self.occupied >= saved,
            "scratch arena cursor {} fell below the scope mark {saved}",
            self.occupied,
        );
        self.open_scopes.pop();
        self.occupied = saved;
    }

    /// Restore a checkpoint without the ordering checks. Used while
    /// unwinding, where a second panic would abort.
    pub(crate) fn unwind_scope(&mut self, saved: usize, depth: usize) {
        self.open_scopes.truncate(depth);
        self.occupied = self.occupied.min(saved);
    }

    fn check(&self, block: &Block) -> Result<std::ops::Range<usize>, AllocError> {
        let start = block.key();
        start
            .checked_add(block.len())
            .filter(|&end| end <= self.occupied)
            .map(|end| start..end)
            .ok_or(AllocError::InvalidBlock { source: NAME })
    }
}

/// Round `offset` up to the next multiple of [`ALIGNMENT`].
fn align_up(offset: usize) -> Option<usize> {
    offset
        .checked_add(ALIGNMENT - 1)
        .map(|padded| padded & !(ALIGNMENT - 1))
}

impl MemorySource for Arena {
    fn name(&self) -> &'static str {
        NAME
    }

    fn allocate(&mut self, size: usize) -> Result<Block, AllocError> {
        self.alloc(size)
    }

    fn grow(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        self.realloc(block, new_size)
    }

    /// Arenas reclaim only in bulk; releasing a block does nothing.
    fn release(&mut self, _block: Block) -> Result<(), AllocError> {
        Ok(())
    }

    fn bytes(&self, block: &Block) -> Result<&[u8], AllocError> {
        let range = self.check(block)?;
        Ok(&self.storage[range])
    }

    fn bytes_mut(&mut self, block: &Block) -> Result<&mut [u8], AllocError> {
        let range = self.check(block)?;
        Ok(&mut self.storage[range])
    }
}
