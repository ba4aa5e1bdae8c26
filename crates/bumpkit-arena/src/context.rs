//! Per-thread memory environment: default allocator plus scratch pool.

use bumpkit_core::{AllocError, Allocator};

use crate::arena::{Arena, SharedArena};
use crate::config::ContextConfig;
use crate::error::ArenaError;
use crate::scratch::ScratchScope;

/// Number of scratch arenas owned by every [`ExecutionContext`].
pub const SCRATCH_POOL_SIZE: usize = 2;

/// The memory environment of one logical thread of work.
///
/// Owns the default [`Allocator`] handle and a fixed pool of
/// [`SCRATCH_POOL_SIZE`] scratch arenas. Nothing here is `Send`; each
/// worker builds its own context.
#[derive(Debug)]
pub struct ExecutionContext {
    allocator: Allocator,
    scratch: Vec<SharedArena>,
}

impl ExecutionContext {
    /// Create a context whose scratch arenas hold `scratch_size` bytes each.
    pub fn new(allocator: Allocator, scratch_size: usize) -> Result<Self, ArenaError> {
        Self::with_config(allocator, &ContextConfig::new(scratch_size))
    }

    /// Create a context from a validated configuration.
    ///
    /// Fails if `allocator` is unbound, if the configuration is invalid, or
    /// if a scratch arena's backing memory cannot be reserved.
    pub fn with_config(allocator: Allocator, config: &ContextConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        if !allocator.is_bound() {
            return Err(ArenaError::Alloc(AllocError::Unbound));
        }
        let scratch = (0..SCRATCH_POOL_SIZE)
            .map(|_| Arena::new(config.scratch_size).map(Arena::into_shared))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            allocator = allocator.name(),
            scratch_size = config.scratch_size,
            pool = SCRATCH_POOL_SIZE,
            "execution context created"
        );
        Ok(Self { allocator, scratch })
    }

    /// The default allocator handle.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// The pooled scratch arena at `slot`, if any.
    pub fn scratch_arena(&self, slot: usize) -> Option<&SharedArena> {
        self.scratch.get(slot)
    }

    /// Open a scratch scope on the first pooled arena that backs none of
    /// the allocators in `conflicts`.
    ///
    /// Pass every allocator whose blocks must outlive the scope, typically
    /// the destination of the work and the allocator of an enclosing scope.
    /// Fails with [`ArenaError::ScratchPoolExhausted`] when every pooled
    /// arena conflicts.
    pub fn begin_scope(&self, conflicts: &[&Allocator]) -> Result<ScratchScope, ArenaError> {
        let slot = self
            .scratch
            .iter()
            .position(|arena| !conflicts.iter().any(|c| c.is_backed_by(arena)))
            .ok_or(ArenaError::ScratchPoolExhausted {
                pool_size: SCRATCH_POOL_SIZE,
                conflicts: conflicts.len(),
            })?;
        Ok(ScratchScope::open(&self.scratch[slot], slot))
    }

    /// Tear the context down, dropping its scratch arenas.
    ///
    /// Blocks handed out by scratch scopes become invalid. The default
    /// allocator handle is returned to the caller.
    pub fn destroy(self) -> Allocator {
        tracing::debug!(allocator = self.allocator.name(), "execution context destroyed");
        self.allocator
    }
}
