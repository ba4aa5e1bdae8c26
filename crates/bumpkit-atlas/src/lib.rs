//! Glyph atlas packing for the bumpkit runtime.
//!
//! A [`ShelfPacker`] places rectangles left to right in rows ("shelves"),
//! opening a new shelf at the tallest extent of the previous ones when the
//! current row is full. A [`TextureAtlas`] pairs a packer with a fixed
//! `u32` pixel buffer held in allocator memory, and a [`GlyphAtlas`] keeps
//! the per-glyph records in a
//! [`GrowableBuffer`](bumpkit_collections::GrowableBuffer) indexed by
//! codepoint.
//!
//! Texture pixel (0, 0) is reserved as an always-opaque default pixel, so
//! atlases pack from `x = 1` on the first shelf.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod error;
pub mod glyph;
pub mod packer;

pub use atlas::{GlyphAtlas, TextureAtlas, OPAQUE};
pub use config::AtlasConfig;
pub use error::AtlasError;
pub use glyph::{Glyph, GlyphMetrics};
pub use packer::ShelfPacker;
