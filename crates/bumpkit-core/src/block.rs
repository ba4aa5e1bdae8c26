//! Allocation receipts.

/// An allocation handed out by a [`MemorySource`](crate::MemorySource).
///
/// A block is a plain receipt: it records where the bytes live inside the
/// source that produced it and how many bytes the caller may touch. It
/// does not own memory and is meaningless to any other source. Bytes are
/// reached through [`Allocator::with_bytes`](crate::Allocator::with_bytes)
/// and friends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    key: usize,
    len: usize,
}

impl Block {
    /// The zero-length block. Valid in every source and never allocated.
    pub const EMPTY: Block = Block { key: 0, len: 0 };

    /// Build a block from a source-defined key and a byte length.
    ///
    /// Only memory sources should call this; the key is interpreted by the
    /// source alone (a byte offset for arenas, a slot index for heaps).
    pub fn new(key: usize, len: usize) -> Self {
        Self { key, len }
    }

    /// Source-defined location of the block.
    pub fn key(&self) -> usize {
        self.key
    }

    /// Number of usable bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block has no usable bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first `len` bytes of this block.
    ///
    /// Used to hand back a right-sized view after writing fewer bytes than
    /// were reserved. `len` is clamped to the current length.
    pub fn prefix(self, len: usize) -> Self {
        Self {
            key: self.key,
            len: len.min(self.len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_has_no_bytes() {
        assert!(Block::EMPTY.is_empty());
        assert_eq!(Block::EMPTY.len(), 0);
    }

    #[test]
    fn prefix_clamps_to_length() {
        let block = Block::new(16, 8);
        assert_eq!(block.prefix(4).len(), 4);
        assert_eq!(block.prefix(4).key(), 16);
        assert_eq!(block.prefix(100).len(), 8);
    }
}
