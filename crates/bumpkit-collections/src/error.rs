//! Text building and formatting errors.

use std::error::Error;
use std::fmt;

use bumpkit_arena::ArenaError;
use bumpkit_core::AllocError;

/// Errors from [`TextBuilder`](crate::TextBuilder) and the formatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextError {
    /// A chunk or the materialized output could not be allocated.
    Alloc(AllocError),
    /// No scratch scope could be opened for staging.
    Scratch(ArenaError),
    /// A directive consumed more arguments than were supplied.
    MissingArgument {
        /// Zero-based position of the missing argument.
        index: usize,
        /// The directive that wanted it, without the leading `%`.
        directive: &'static str,
    },
    /// An argument's kind or value does not fit its directive.
    ArgumentMismatch {
        /// Zero-based position of the argument.
        index: usize,
        /// The directive it was matched against, without the leading `%`.
        directive: &'static str,
    },
    /// A numeric base outside `2..=36`.
    InvalidRadix(u32),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "text allocation failed: {err}"),
            Self::Scratch(err) => write!(f, "text staging failed: {err}"),
            Self::MissingArgument { index, directive } => {
                write!(f, "missing argument {index} for %{directive}")
            }
            Self::ArgumentMismatch { index, directive } => {
                write!(f, "argument {index} does not fit %{directive}")
            }
            Self::InvalidRadix(base) => write!(f, "invalid numeric base {base}, expected 2..=36"),
        }
    }
}

impl Error for TextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Scratch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for TextError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl From<ArenaError> for TextError {
    fn from(err: ArenaError) -> Self {
        Self::Scratch(err)
    }
}
