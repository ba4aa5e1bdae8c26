//! Core allocator abstractions for the bumpkit memory runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! capability every other bumpkit crate allocates through:
//!
//! - [`MemorySource`]: the three-operation interface (allocate / grow /
//!   release) plus byte access, implemented by heaps and arenas.
//! - [`Allocator`]: a cheaply cloned handle to a shared source. Higher
//!   layers only ever see this handle, never a concrete source.
//! - [`Block`]: an opaque allocation receipt, valid only with the source
//!   that produced it.
//! - [`HeapAllocator`]: the general-purpose default source.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod block;
pub mod config;
pub mod error;
pub mod heap;

pub use allocator::{Allocator, MemorySource};
pub use block::Block;
pub use config::{ConfigError, HeapConfig};
pub use error::{try_zeroed, AllocError};
pub use heap::HeapAllocator;
