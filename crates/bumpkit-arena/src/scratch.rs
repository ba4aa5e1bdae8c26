//! Checkpointed scratch allocation.
//!
//! A [`ScratchScope`] is a reservation into one pooled scratch arena. It
//! records the arena's cursor when opened and rolls the cursor back when
//! it ends, so everything allocated through the scope is reclaimed in one
//! step. Scopes are opened by
//! [`ExecutionContext::begin_scope`](crate::ExecutionContext::begin_scope).

use std::fmt;

use bumpkit_core::Allocator;

use crate::arena::{Arena, SharedArena};

/// A checkpoint into a scratch arena, rolled back on [`end`](Self::end)
/// or drop.
///
/// Allocate through [`allocator`](Self::allocator). Blocks obtained that
/// way are valid until the scope ends. Scopes on the same arena must end
/// in reverse order of opening.
///
/// # Example
///
/// ```
/// use bumpkit_arena::ExecutionContext;
/// use bumpkit_core::{Allocator, HeapAllocator};
///
/// let ctx = ExecutionContext::new(Allocator::new(HeapAllocator::new()), 4096)?;
/// let output = ctx.allocator().clone();
///
/// let scope = ctx.begin_scope(&[&output])?;
/// let tmp = scope.allocator().allocate(256)?;
/// scope.allocator().write(&tmp, 0, b"staged")?;
/// let result = output.allocate(6)?;
/// scope.allocator().copy_into(&tmp, 6, &output, &result, 0)?;
/// scope.end();
///
/// assert_eq!(output.to_vec(&result)?, b"staged");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ScratchScope {
    arena: SharedArena,
    allocator: Allocator,
    /// Arena cursor at the time the scope opened.
    saved: usize,
    /// Number of scopes already open on the arena when this one opened.
    depth: usize,
    /// Index of the arena within the context's pool.
    slot: usize,
    closed: bool,
}

impl ScratchScope {
    pub(crate) fn open(arena: &SharedArena, slot: usize) -> Self {
        let (saved, depth) = arena.borrow_mut().push_scope();
        tracing::trace!(slot, saved, depth, "scratch scope opened");
        Self {
            arena: SharedArena::clone(arena),
            allocator: Arena::allocator(arena),
            saved,
            depth,
            slot,
            closed: false,
        }
    }

    /// Allocator bound to the scope's scratch arena.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// The arena cursor this scope rolls back to.
    pub fn saved_occupied(&self) -> usize {
        self.saved
    }

    /// Index of the pooled arena this scope is bound to.
    pub fn pool_slot(&self) -> usize {
        self.slot
    }

    /// Close the scope, rolling the arena back to the saved cursor.
    ///
    /// # Panics
    ///
    /// Panics if a scope opened after this one on the same arena is still
    /// open, or if the arena's cursor fell below the saved mark while the
    /// scope was open.
    pub fn end(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.arena.borrow_mut().pop_scope(self.saved, self.depth);
        tracing::trace!(slot = self.slot, saved = self.saved, "scratch scope closed");
    }
}

impl Drop for ScratchScope {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if !self.closed {
                self.closed = true;
                if let Ok(mut arena) = self.arena.try_borrow_mut() {
                    arena.unwind_scope(self.saved, self.depth);
                }
            }
            return;
        }
        self.close();
    }
}

impl fmt::Debug for ScratchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchScope")
            .field("slot", &self.slot)
            .field("saved", &self.saved)
            .field("depth", &self.depth)
            .field("closed", &self.closed)
            .finish()
    }
}
