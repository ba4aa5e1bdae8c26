//! Bumpkit: explicit allocator handles, bump arenas and scratch scopes for
//! short-lived, frame-style workloads.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all bumpkit sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use bumpkit::prelude::*;
//!
//! let ctx = ExecutionContext::new(Allocator::new(HeapAllocator::new()), 64 * 1024).unwrap();
//! let out = ctx.allocator().clone();
//!
//! // Render into scratch, copy only the result into `out`.
//! let block = formatted(&ctx, &out, "%s has %u glyphs", &args!["font", 95u32]).unwrap();
//! assert_eq!(out.to_vec(&block).unwrap(), b"font has 95 glyphs");
//!
//! // Scratch memory is reclaimed when the scope ends.
//! let scope = ctx.begin_scope(&[&out]).unwrap();
//! let mut atlas = GlyphAtlas::new(scope.allocator(), scope.allocator(), &AtlasConfig::new(64, 64)).unwrap();
//! let glyph = atlas
//!     .add_glyph(
//!         GlyphMetrics { codepoint: 'A' as u32, advance: 8, x_offset: 0, y_offset: 0, width: 8, height: 2 },
//!         &[b"18", b"3c"],
//!     )
//!     .unwrap();
//! assert_eq!(glyph.placement(), Some((1, 0)));
//! scope.end();
//!
//! out.release(block).unwrap();
//! let _heap = ctx.destroy();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`memory`] | `bumpkit-core` | `Allocator` handles, `Block`, the heap source, errors |
//! | [`arena`] | `bumpkit-arena` | Bump arenas, execution contexts, scratch scopes |
//! | [`collections`] | `bumpkit-collections` | Growable buffers, text builder, formatting, UTF-8/16, byte strings |
//! | [`atlas`] | `bumpkit-atlas` | Shelf packer, texture and glyph atlases |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator handles and the heap memory source (`bumpkit-core`).
///
/// [`memory::MemorySource`] is the extension point for custom backing
/// memory; [`memory::Allocator`] is the cloneable handle every other crate
/// takes.
pub use bumpkit_core as memory;

/// Bump arenas and scratch scopes (`bumpkit-arena`).
///
/// An [`arena::ExecutionContext`] owns a general allocator plus a small
/// pool of scratch arenas handed out through [`arena::ScratchScope`].
pub use bumpkit_arena as arena;

/// Allocator-backed containers and text utilities (`bumpkit-collections`).
pub use bumpkit_collections as collections;

/// Glyph atlas packing (`bumpkit-atlas`).
pub use bumpkit_atlas as atlas;

pub use bumpkit_collections::args;

/// Common imports for typical bumpkit usage.
///
/// ```rust
/// use bumpkit::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use bumpkit_core::{AllocError, Allocator, Block, HeapAllocator, MemorySource};

    // Arenas and scopes
    pub use bumpkit_arena::{Arena, ArenaError, ExecutionContext, ScratchScope};

    // Collections
    pub use bumpkit_collections::{args, formatted, Arg, GrowableBuffer, TextBuilder, TextError};

    // Atlas
    pub use bumpkit_atlas::{AtlasConfig, AtlasError, Glyph, GlyphAtlas, GlyphMetrics, TextureAtlas};
}
