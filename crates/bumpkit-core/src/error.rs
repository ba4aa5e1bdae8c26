//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors reported by a [`MemorySource`](crate::MemorySource) or an
/// [`Allocator`](crate::Allocator) handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A fixed-capacity source (arena, budgeted heap) cannot fit the request.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still available in the source at the time of the request.
        remaining: usize,
    },
    /// The system allocator refused to provide backing memory.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The handle is not bound to any memory source.
    Unbound,
    /// The source was already borrowed, e.g. an allocation was attempted
    /// from inside a byte-access closure on the same source.
    Reentrant,
    /// The block does not describe live memory in this source.
    InvalidBlock {
        /// Name of the source that rejected the block.
        source: &'static str,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "capacity exceeded: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: could not reserve {requested} bytes")
            }
            Self::Unbound => write!(f, "allocator handle is not bound to a memory source"),
            Self::Reentrant => write!(f, "memory source is already borrowed"),
            Self::InvalidBlock { source } => {
                write!(f, "block does not belong to live memory in {source}")
            }
        }
    }
}

impl Error for AllocError {}

/// Reserve `size` zeroed bytes without aborting on allocation failure.
///
/// Shared by every source that owns its backing memory: a refused
/// reservation becomes [`AllocError::OutOfMemory`] instead of an abort.
pub fn try_zeroed(size: usize) -> Result<Vec<u8>, AllocError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size)
        .map_err(|_| AllocError::OutOfMemory { requested: size })?;
    bytes.resize(size, 0);
    Ok(bytes)
}
