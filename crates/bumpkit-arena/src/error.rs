//! Arena and scratch-scope error types.

use std::error::Error;
use std::fmt;

use bumpkit_core::{AllocError, ConfigError};

/// Errors from building an execution context or opening a scratch scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Every pooled scratch arena backs one of the caller's conflicting
    /// allocators, so no scope can be opened.
    ScratchPoolExhausted {
        /// Number of arenas in the pool.
        pool_size: usize,
        /// Number of conflicting allocators the caller passed.
        conflicts: usize,
    },
    /// The context configuration is invalid.
    Config(ConfigError),
    /// Backing memory for a scratch arena could not be reserved, or the
    /// default allocator is unusable.
    Alloc(AllocError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScratchPoolExhausted {
                pool_size,
                conflicts,
            } => {
                write!(
                    f,
                    "scratch pool exhausted: all {pool_size} arenas conflict with the {conflicts} given allocators"
                )
            }
            Self::Config(err) => write!(f, "invalid context config: {err}"),
            Self::Alloc(err) => write!(f, "scratch allocation failed: {err}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Alloc(err) => Some(err),
            Self::ScratchPoolExhausted { .. } => None,
        }
    }
}

impl From<AllocError> for ArenaError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl From<ConfigError> for ArenaError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
