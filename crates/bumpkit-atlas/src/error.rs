//! Atlas error types.

use std::error::Error;
use std::fmt;

use bumpkit_collections::TextError;
use bumpkit_core::{AllocError, ConfigError};

/// Errors from building or drawing into an atlas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtlasError {
    /// The atlas configuration is invalid.
    Config(ConfigError),
    /// Pixel or glyph storage could not be allocated or accessed.
    Alloc(AllocError),
    /// Rendering the texture as text failed.
    Text(TextError),
    /// A rectangle does not lie inside the texture.
    OutOfBounds {
        /// Left edge.
        x: u32,
        /// Top edge.
        y: u32,
        /// Rectangle width.
        width: u32,
        /// Rectangle height.
        height: u32,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid atlas config: {err}"),
            Self::Alloc(err) => write!(f, "atlas storage failed: {err}"),
            Self::Text(err) => write!(f, "atlas rendering failed: {err}"),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "rectangle {width}x{height} at ({x}, {y}) lies outside the texture"
            ),
        }
    }
}

impl Error for AtlasError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Alloc(err) => Some(err),
            Self::Text(err) => Some(err),
            Self::OutOfBounds { .. } => None,
        }
    }
}

impl From<ConfigError> for AtlasError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<AllocError> for AtlasError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl From<TextError> for AtlasError {
    fn from(err: TextError) -> Self {
        Self::Text(err)
    }
}
