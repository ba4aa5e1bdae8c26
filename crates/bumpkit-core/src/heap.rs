//! General-purpose memory source with individual release.

use crate::allocator::MemorySource;
use crate::block::Block;
use crate::config::{ConfigError, HeapConfig};
use crate::error::{try_zeroed, AllocError};

const NAME: &str = "heap";

/// The default memory source.
///
/// Each allocation lives in its own slot; released slots go on a free list
/// and are reused by later allocations. Backing memory is reserved with
/// fallible reservation, so a refused request surfaces as
/// [`AllocError::OutOfMemory`] instead of aborting the process.
///
/// An optional byte budget ([`HeapConfig::limit`]) bounds the live bytes.
#[derive(Debug, Default)]
pub struct HeapAllocator {
    /// Slot storage. `None` marks a released slot.
    slots: Vec<Option<Vec<u8>>>,
    /// Indices of released slots, reused LIFO.
    free_list: Vec<usize>,
    /// Sum of the lengths of all live slots.
    live_bytes: usize,
    limit: Option<usize>,
}

impl HeapAllocator {
    /// An unbounded heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// A heap configured by `config`.
    pub fn with_config(config: &HeapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            limit: config.limit,
            ..Self::default()
        })
    }

    /// Bytes currently held by live allocations.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Number of live allocations.
    pub fn live_blocks(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    fn check_budget(&self, extra: usize) -> Result<(), AllocError> {
        if let Some(limit) = self.limit {
            let remaining = limit.saturating_sub(self.live_bytes);
            if extra > remaining {
                return Err(AllocError::CapacityExceeded {
                    requested: extra,
                    remaining,
                });
            }
        }
        Ok(())
    }

    fn slot(&self, block: &Block) -> Result<&Vec<u8>, AllocError> {
        self.slots
            .get(block.key())
            .and_then(Option::as_ref)
            .filter(|bytes| block.len() <= bytes.len())
            .ok_or(AllocError::InvalidBlock { source: NAME })
    }

    fn slot_mut(&mut self, block: &Block) -> Result<&mut Vec<u8>, AllocError> {
        self.slots
            .get_mut(block.key())
            .and_then(Option::as_mut)
            .filter(|bytes| block.len() <= bytes.len())
            .ok_or(AllocError::InvalidBlock { source: NAME })
    }
}

impl MemorySource for HeapAllocator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn allocate(&mut self, size: usize) -> Result<Block, AllocError> {
        if size == 0 {
            return Ok(Block::EMPTY);
        }
        self.check_budget(size)?;
        let bytes = try_zeroed(size)?;
        let key = match self.free_list.pop() {
            Some(key) => {
                self.slots[key] = Some(bytes);
                key
            }
            None => {
                self.slots.push(Some(bytes));
                self.slots.len() - 1
            }
        };
        self.live_bytes += size;
        Ok(Block::new(key, size))
    }

    fn grow(&mut self, block: Block, new_size: usize) -> Result<Block, AllocError> {
        if block.is_empty() {
            return self.allocate(new_size);
        }
        let current = self.slot(&block)?.len();
        if new_size <= block.len() {
            return Ok(block);
        }
        // A trimmed receipt regrows into its slot's spare bytes first.
        if new_size <= current {
            self.slot_mut(&block)?[block.len()..new_size].fill(0);
            return Ok(Block::new(block.key(), new_size));
        }
        let extra = new_size - current;
        self.check_budget(extra)?;
        let bytes = self.slot_mut(&block)?;
        bytes
            .try_reserve_exact(extra)
            .map_err(|_| AllocError::OutOfMemory {
                requested: new_size,
            })?;
        bytes.resize(new_size, 0);
        self.live_bytes += extra;
        Ok(Block::new(block.key(), new_size))
    }

    fn release(&mut self, block: Block) -> Result<(), AllocError> {
        if block.is_empty() {
            return Ok(());
        }
        self.slot(&block)?;
        if let Some(bytes) = self.slots[block.key()].take() {
            self.live_bytes -= bytes.len();
            self.free_list.push(block.key());
        }
        Ok(())
    }

    fn bytes(&self, block: &Block) -> Result<&[u8], AllocError> {
        let bytes = self.slot(block)?;
        Ok(&bytes[..block.len()])
    }

    fn bytes_mut(&mut self, block: &Block) -> Result<&mut [u8], AllocError> {
        let len = block.len();
        let bytes = self.slot_mut(block)?;
        Ok(&mut bytes[..len])
    }
}
