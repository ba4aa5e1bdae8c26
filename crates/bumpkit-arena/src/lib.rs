//! Bump arenas and scratch-memory scopes for the bumpkit runtime.
//!
//! # Architecture
//!
//! ```text
//! ExecutionContext (one per thread of work)
//! ├── Allocator (default, usually a HeapAllocator)
//! └── SharedArena × 2 (scratch pool)
//!     └── ScratchScope (checkpoint: saved cursor, rolled back on end/drop)
//! ```
//!
//! An [`Arena`] is a fixed-capacity bump region. It hands out 8-byte
//! aligned blocks, never frees them individually, and reclaims only in
//! bulk ([`Arena::clear`] or drop). Wrapped in a [`SharedArena`] it is
//! usable through an [`Allocator`](bumpkit_core::Allocator) handle.
//!
//! [`ExecutionContext::begin_scope`] picks a scratch arena that does not
//! back any of the caller's allocators and returns a [`ScratchScope`].
//! Scopes on one arena must close in reverse order of opening; closing out
//! of order, or after the arena was cleared under the scope, panics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod context;
pub mod error;
pub mod scratch;

pub use arena::{Arena, SharedArena, ALIGNMENT};
pub use config::ContextConfig;
pub use context::{ExecutionContext, SCRATCH_POOL_SIZE};
pub use error::ArenaError;
pub use scratch::ScratchScope;
