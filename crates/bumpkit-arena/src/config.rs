//! Execution-context configuration.

use bumpkit_core::ConfigError;

/// Configuration for an [`ExecutionContext`](crate::ExecutionContext).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextConfig {
    /// Capacity of each pooled scratch arena, in bytes.
    ///
    /// Default: 1 MiB. Must be non-zero.
    pub scratch_size: usize,
}

impl ContextConfig {
    /// Default scratch arena capacity: 1 MiB.
    pub const DEFAULT_SCRATCH_SIZE: usize = 1024 * 1024;

    /// Configuration with the given scratch arena capacity.
    pub fn new(scratch_size: usize) -> Self {
        Self { scratch_size }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "scratch_size",
                reason: "scratch arenas need a non-zero capacity".into(),
            });
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCRATCH_SIZE)
    }
}
