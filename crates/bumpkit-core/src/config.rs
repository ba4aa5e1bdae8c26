//! Configuration for the default heap source and the shared config error.

use std::error::Error;
use std::fmt;

/// Configuration for [`HeapAllocator`](crate::HeapAllocator).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapConfig {
    /// Upper bound on live bytes. `None` means only the system allocator
    /// limits growth. Useful to make exhaustion reproducible in tests and
    /// to cap tools that must not balloon.
    pub limit: Option<usize>,
}

impl HeapConfig {
    /// A heap that refuses to hold more than `limit` live bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == Some(0) {
            return Err(ConfigError::Invalid {
                field: "limit",
                reason: "a heap limit of zero bytes cannot satisfy any allocation".into(),
            });
        }
        Ok(())
    }
}

/// A configuration value failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value outside its valid range.
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let config = HeapConfig::default();
        assert_eq!(config.limit, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = HeapConfig::with_limit(0).validate().unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
