//! Atlas configuration.

use bumpkit_core::ConfigError;

/// Texture dimensions for a [`TextureAtlas`](crate::TextureAtlas).
///
/// Validated at construction; the texture is never resized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Texture width in pixels. Default: 512.
    pub width: u32,
    /// Texture height in pixels. Default: 512.
    pub height: u32,
}

impl AtlasConfig {
    /// Default edge length of the texture.
    pub const DEFAULT_SIZE: u32 = 512;

    /// Largest edge length. Placements are stored as `u16` coordinates.
    pub const MAX_SIZE: u32 = 1 << 16;

    /// Configuration for a `width` x `height` texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the pixel buffer in bytes.
    pub fn pixel_bytes(&self) -> Option<usize> {
        let pixels = usize::try_from(self.width)
            .ok()?
            .checked_mul(usize::try_from(self.height).ok()?)?;
        pixels.checked_mul(4)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "texture edges must be non-zero".into(),
                });
            }
            if value > Self::MAX_SIZE {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} exceeds the maximum edge of {}", Self::MAX_SIZE),
                });
            }
        }
        if self.pixel_bytes().is_none() {
            return Err(ConfigError::Invalid {
                field: "width",
                reason: format!(
                    "{} x {} pixels overflow the address space",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_512_square() {
        let config = AtlasConfig::default();
        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.pixel_bytes(), Some(512 * 512 * 4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_edge_is_rejected() {
        let err = AtlasConfig::new(0, 16).validate().unwrap_err();
        assert!(err.to_string().contains("width"));
        assert!(AtlasConfig::new(16, 0).validate().is_err());
    }

    #[test]
    fn oversized_edge_is_rejected() {
        assert!(AtlasConfig::new(AtlasConfig::MAX_SIZE, 1).validate().is_ok());
        let err = AtlasConfig::new(1, AtlasConfig::MAX_SIZE + 1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("height"));
    }
}
