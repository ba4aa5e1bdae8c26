//! Glyph records.

use bytemuck::{Pod, Zeroable};

/// Metrics of one glyph as read from a font source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Unicode codepoint.
    pub codepoint: u32,
    /// Horizontal advance in pixels.
    pub advance: u16,
    /// Bitmap offset from the pen position.
    pub x_offset: i16,
    /// Bitmap offset from the baseline.
    pub y_offset: i16,
    /// Bitmap width in pixels.
    pub width: u16,
    /// Bitmap height in pixels.
    pub height: u16,
}

/// One packed glyph: metrics plus its placement in the texture.
///
/// Stored in a growable buffer, so the layout is plain old data with no
/// padding. Placement (`u`, `v`) is meaningful only when
/// [`is_placed`](Self::is_placed) is true; unplaced glyphs keep zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Glyph {
    /// Unicode codepoint.
    pub codepoint: u32,
    /// Horizontal advance in pixels.
    pub advance: u16,
    /// Bitmap offset from the pen position.
    pub x_offset: i16,
    /// Bitmap offset from the baseline.
    pub y_offset: i16,
    /// Bitmap width in pixels.
    pub width: u16,
    /// Bitmap height in pixels.
    pub height: u16,
    /// Left edge of the bitmap in the texture.
    pub u: u16,
    /// Top edge of the bitmap in the texture.
    pub v: u16,
    /// Bit set; see [`Glyph::PLACED`].
    pub flags: u16,
}

impl Glyph {
    /// Set once the packer found room for the bitmap.
    pub const PLACED: u16 = 1 << 0;

    /// An unplaced record carrying `metrics`.
    pub fn from_metrics(metrics: GlyphMetrics) -> Self {
        Self {
            codepoint: metrics.codepoint,
            advance: metrics.advance,
            x_offset: metrics.x_offset,
            y_offset: metrics.y_offset,
            width: metrics.width,
            height: metrics.height,
            ..Self::default()
        }
    }

    /// Whether the bitmap has a place in the texture.
    pub fn is_placed(&self) -> bool {
        self.flags & Self::PLACED != 0
    }

    /// The bitmap's top-left corner in the texture, if placed.
    pub fn placement(&self) -> Option<(u16, u16)> {
        self.is_placed().then_some((self.u, self.v))
    }

    /// Record a placement. Coordinates are set together with the flag.
    pub fn place_at(&mut self, u: u16, v: u16) {
        self.u = u;
        self.v = v;
        self.flags |= Self::PLACED;
    }
}
