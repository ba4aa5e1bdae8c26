//! The allocator capability: a trait for memory sources and a shared handle.
//!
//! Every bumpkit container allocates through an [`Allocator`] handle. The
//! handle is a reference-counted pointer to a [`MemorySource`]; cloning it
//! is cheap and never copies or owns allocations. Arenas, scratch scopes,
//! and the default heap are interchangeable behind it.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::block::Block;
use crate::error::AllocError;

/// A memory source behind an [`Allocator`] handle.
///
/// Sources allocate, grow and release blocks, and give byte access to the
/// blocks they hand out. Bump sources (arenas) treat
/// [`release`](MemorySource::release) as a no-op and reclaim only in bulk.
pub trait MemorySource {
    /// Short human-readable name used in diagnostics and errors.
    fn name(&self) -> &'static str;

    /// Allocate `size` bytes.
    fn allocate(&mut self, size: usize) -> Result<Block, AllocError>;

    /// Grow `block` to `new_size` bytes, preserving its contents.
    ///
    /// A source may return the same block (in-place growth or a request
    /// that does not grow) or a new one; callers must use the returned
    /// block from then on.
    fn grow(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError>;

    /// Give `block` back to the source.
    fn release(&mut self, block: Block) -> Result<(), AllocError>;

    /// Shared view of a block's bytes.
    fn bytes(&self, block: &Block) -> Result<&[u8], AllocError>;

    /// Mutable view of a block's bytes.
    fn bytes_mut(&mut self, block: &Block) -> Result<&mut [u8], AllocError>;
}

type SharedSource = Rc<RefCell<dyn MemorySource>>;

/// Bytes moved per step when copying between blocks through a bounce buffer.
const COPY_STEP: usize = 512;

/// A swappable handle to a memory source.
///
/// The handle may be unbound ([`Allocator::unbound`], also the `Default`);
/// every operation on an unbound handle fails with [`AllocError::Unbound`].
///
/// Byte access goes through closures ([`with_bytes`](Self::with_bytes),
/// [`with_bytes_mut`](Self::with_bytes_mut)) that borrow the source for the
/// duration of the call. Calling back into the same source from inside such
/// a closure fails with [`AllocError::Reentrant`].
#[derive(Clone, Default)]
pub struct Allocator {
    source: Option<SharedSource>,
}

impl Allocator {
    /// Wrap a source in a fresh handle.
    pub fn new<S: MemorySource + 'static>(source: S) -> Self {
        Self::from_shared(Rc::new(RefCell::new(source)))
    }

    /// Build a handle to a source that the caller also keeps a typed
    /// reference to (e.g. an arena whose cursor the caller inspects).
    pub fn from_shared<S: MemorySource + 'static>(source: Rc<RefCell<S>>) -> Self {
        let source: SharedSource = source;
        Self {
            source: Some(source),
        }
    }

    /// A handle bound to no source.
    pub fn unbound() -> Self {
        Self { source: None }
    }

    /// Whether the handle points at a source.
    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Name of the underlying source, `"unbound"` for an unbound handle.
    pub fn name(&self) -> &'static str {
        match &self.source {
            None => "unbound",
            Some(source) => source.try_borrow().map(|s| s.name()).unwrap_or("busy"),
        }
    }

    /// Whether both handles route to the same source.
    pub fn same_source(&self, other: &Allocator) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }

    /// Whether this handle routes to `source`.
    pub fn is_backed_by<S: MemorySource + 'static>(&self, source: &Rc<RefCell<S>>) -> bool {
        match &self.source {
            Some(own) => std::ptr::addr_eq(Rc::as_ptr(own), Rc::as_ptr(source)),
            None => false,
        }
    }

    fn source(&self) -> Result<Ref<'_, dyn MemorySource + 'static>, AllocError> {
        let source = self.source.as_ref().ok_or(AllocError::Unbound)?;
        source.try_borrow().map_err(|_| AllocError::Reentrant)
    }

    fn source_mut(&self) -> Result<RefMut<'_, dyn MemorySource + 'static>, AllocError> {
        let source = self.source.as_ref().ok_or(AllocError::Unbound)?;
        source.try_borrow_mut().map_err(|_| AllocError::Reentrant)
    }

    /// Allocate `size` bytes from the source.
    pub fn allocate(&self, size: usize) -> Result<Block, AllocError> {
        self.source_mut()?.allocate(size)
    }

    /// Grow `block` to `new_size` bytes. See [`MemorySource::grow`].
    pub fn grow(&self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        self.source_mut()?.grow(block, new_size)
    }

    /// Return `block` to the source. A no-op for bump sources.
    pub fn release(&self, block: Block) -> Result<(), AllocError> {
        let mut source = self.source_mut()?;
        if block.is_empty() {
            return Ok(());
        }
        source.release(block)
    }

    /// Run `f` over the block's bytes.
    ///
    /// An empty block needs no source memory, so `f` runs over an empty
    /// slice even on an unbound handle.
    pub fn with_bytes<R>(&self, block: &Block, f: impl FnOnce(&[u8]) -> R) -> Result<R, AllocError> {
        if block.is_empty() {
            return Ok(f(&[]));
        }
        let source = self.source()?;
        let bytes = source.bytes(block)?;
        Ok(f(bytes))
    }

    /// Run `f` over the block's bytes, mutably.
    pub fn with_bytes_mut<R>(
        &self,
        block: &Block,
        f: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<R, AllocError> {
        if block.is_empty() {
            return Ok(f(&mut []));
        }
        let mut source = self.source_mut()?;
        let bytes = source.bytes_mut(block)?;
        Ok(f(bytes))
    }

    /// Copy `data` into `block` starting at byte `offset`.
    pub fn write(&self, block: &Block, offset: usize, data: &[u8]) -> Result<(), AllocError> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= block.len())
            .ok_or(AllocError::InvalidBlock {
                source: self.name(),
            })?;
        self.with_bytes_mut(block, |bytes| bytes[offset..end].copy_from_slice(data))
    }

    /// Copy bytes out of `block`, starting at byte `offset`, into `out`.
    pub fn read(&self, block: &Block, offset: usize, out: &mut [u8]) -> Result<(), AllocError> {
        let end = offset
            .checked_add(out.len())
            .filter(|&end| end <= block.len())
            .ok_or(AllocError::InvalidBlock {
                source: self.name(),
            })?;
        self.with_bytes(block, |bytes| out.copy_from_slice(&bytes[offset..end]))
    }

    /// Copy the whole block into a new `Vec`.
    pub fn to_vec(&self, block: &Block) -> Result<Vec<u8>, AllocError> {
        self.with_bytes(block, <[u8]>::to_vec)
    }

    /// Copy `len` bytes from `src` (in this source) into `dst` (in `target`,
    /// possibly the same source) at `dst_offset`.
    ///
    /// The bytes move through a small stack buffer so the two sources are
    /// never borrowed at the same time.
    pub fn copy_into(
        &self,
        src: &Block,
        len: usize,
        target: &Allocator,
        dst: &Block,
        dst_offset: usize,
    ) -> Result<(), AllocError> {
        let mut bounce = [0u8; COPY_STEP];
        let mut done = 0;
        while done < len {
            let step = (len - done).min(COPY_STEP);
            self.read(src, done, &mut bounce[..step])?;
            target.write(dst, dst_offset + done, &bounce[..step])?;
            done += step;
        }
        Ok(())
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("source", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapAllocator;

    #[test]
    fn unbound_handle_fails_every_operation() {
        let alloc = Allocator::unbound();
        assert!(!alloc.is_bound());
        assert_eq!(alloc.allocate(8), Err(AllocError::Unbound));
        assert_eq!(alloc.grow(Block::EMPTY, 8), Err(AllocError::Unbound));
        assert_eq!(alloc.release(Block::EMPTY), Err(AllocError::Unbound));
    }

    #[test]
    fn unbound_handle_reads_empty_block() {
        let alloc = Allocator::unbound();
        assert_eq!(alloc.to_vec(&Block::EMPTY), Ok(Vec::new()));
        assert_eq!(alloc.with_bytes_mut(&Block::EMPTY, |b| b.len()), Ok(0));
        assert_eq!(alloc.to_vec(&Block::new(0, 4)), Err(AllocError::Unbound));
    }

    #[test]
    fn default_handle_is_unbound() {
        assert!(!Allocator::default().is_bound());
        assert_eq!(Allocator::default().name(), "unbound");
    }

    #[test]
    fn clones_share_a_source() {
        let a = Allocator::new(HeapAllocator::new());
        let b = a.clone();
        let c = Allocator::new(HeapAllocator::new());
        assert!(a.same_source(&b));
        assert!(!a.same_source(&c));
        assert!(!a.same_source(&Allocator::unbound()));
    }

    #[test]
    fn is_backed_by_matches_typed_reference() {
        let heap = Rc::new(RefCell::new(HeapAllocator::new()));
        let alloc = Allocator::from_shared(heap.clone());
        let other = Rc::new(RefCell::new(HeapAllocator::new()));
        assert!(alloc.is_backed_by(&heap));
        assert!(!alloc.is_backed_by(&other));
    }

    #[test]
    fn write_then_read_roundtrips() {
        let alloc = Allocator::new(HeapAllocator::new());
        let block = alloc.allocate(8).unwrap();
        alloc.write(&block, 2, b"abc").unwrap();
        let mut out = [0u8; 3];
        alloc.read(&block, 2, &mut out).unwrap();
        assert_eq!(&out, b"abc");
    }

    #[test]
    fn write_past_end_is_rejected() {
        let alloc = Allocator::new(HeapAllocator::new());
        let block = alloc.allocate(4).unwrap();
        let result = alloc.write(&block, 2, b"abc");
        assert!(matches!(result, Err(AllocError::InvalidBlock { .. })));
    }

    #[test]
    fn reentrant_allocation_is_reported() {
        let alloc = Allocator::new(HeapAllocator::new());
        let block = alloc.allocate(4).unwrap();
        let inner = alloc
            .with_bytes_mut(&block, |_| alloc.allocate(4))
            .unwrap();
        assert_eq!(inner, Err(AllocError::Reentrant));
    }

    #[test]
    fn copy_into_same_source_uses_bounce_buffer() {
        let alloc = Allocator::new(HeapAllocator::new());
        let src = alloc.allocate(1500).unwrap();
        let data: Vec<u8> = (0..1500u32).map(|i| (i % 251) as u8).collect();
        alloc.write(&src, 0, &data).unwrap();
        let dst = alloc.allocate(1504).unwrap();
        alloc.copy_into(&src, 1500, &alloc, &dst, 4).unwrap();
        let out = alloc.to_vec(&dst).unwrap();
        assert_eq!(&out[4..], &data[..]);
    }

    #[test]
    fn empty_block_access_needs_no_source_memory() {
        let alloc = Allocator::new(HeapAllocator::new());
        let len = alloc.with_bytes(&Block::EMPTY, |b| b.len()).unwrap();
        assert_eq!(len, 0);
        assert!(alloc.release(Block::EMPTY).is_ok());
    }
}
