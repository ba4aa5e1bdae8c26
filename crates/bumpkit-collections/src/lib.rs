//! Containers and text utilities built on bumpkit allocator handles.
//!
//! Everything here allocates through an
//! [`Allocator`](bumpkit_core::Allocator) and is agnostic to whether that
//! handle routes to the heap, an arena, or a scratch scope.
//!
//! - [`GrowableBuffer`]: a contiguous sequence of POD elements with
//!   amortized-doubling growth through a captured owner allocator.
//! - [`TextBuilder`]: an append-only byte sequence stored in fixed 4 KiB
//!   chunks, with a `%`-directive formatter ([`format`]).
//! - [`unicode`]: UTF-8 and UTF-16LE transcoding over byte slices.
//! - [`strings`]: trimming, splitting and integer parsing on byte slices.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod format;
pub mod strings;
pub mod text;
pub mod unicode;

pub use buffer::GrowableBuffer;
pub use error::TextError;
pub use format::{Arg, Directive, Lookup};
pub use text::{formatted, TextBuilder, CHUNK_SIZE};
