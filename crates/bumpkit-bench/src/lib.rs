//! Benchmark profiles for the bumpkit runtime.
//!
//! - [`glyph_profile`]: a deterministic set of glyph metrics and bitmaps
//!   shaped like a small bitmap font
//! - [`sample_text`]: mixed ASCII and multi-byte UTF-8 text of a given size
//! - [`fill_atlas`]: packs a glyph profile into a fresh atlas

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpkit_atlas::{AtlasConfig, AtlasError, GlyphAtlas, GlyphMetrics};
use bumpkit_core::Allocator;

/// One glyph of a profile: its metrics and hex-encoded bitmap rows.
#[derive(Clone, Debug)]
pub struct ProfileGlyph {
    /// Metrics handed to the atlas.
    pub metrics: GlyphMetrics,
    /// One hex string per bitmap row.
    pub rows: Vec<Vec<u8>>,
}

/// `count` glyphs starting at U+0020 with widths cycling through 4..=15
/// and heights through 8..=19.
///
/// Bitmaps alternate between a solid and a checkered pattern.
pub fn glyph_profile(count: u32) -> Vec<ProfileGlyph> {
    (0..count)
        .map(|i| {
            let width = 4 + (i % 12) as u16;
            let height = 8 + (i % 12) as u16;
            let stride = usize::from(width).div_ceil(8);
            let byte = if i % 2 == 0 { "ff" } else { "aa" };
            let rows = (0..height)
                .map(|_| byte.repeat(stride).into_bytes())
                .collect();
            ProfileGlyph {
                metrics: GlyphMetrics {
                    codepoint: 0x20 + i,
                    advance: width + 1,
                    x_offset: 0,
                    y_offset: -2,
                    width,
                    height,
                },
                rows,
            }
        })
        .collect()
}

/// Pack `glyphs` into a new atlas of `config` size.
///
/// Records and texture both live in `allocator`.
pub fn fill_atlas(
    allocator: &Allocator,
    config: &AtlasConfig,
    glyphs: &[ProfileGlyph],
) -> Result<GlyphAtlas, AtlasError> {
    let mut atlas = GlyphAtlas::new(allocator, allocator, config)?;
    for glyph in glyphs {
        let rows: Vec<&[u8]> = glyph.rows.iter().map(Vec::as_slice).collect();
        atlas.add_glyph(glyph.metrics, &rows)?;
    }
    Ok(atlas)
}

/// At least `len` bytes of UTF-8 text mixing ASCII with two-, three- and
/// four-byte sequences.
pub fn sample_text(len: usize) -> String {
    const PIECES: [&str; 4] = ["glyph ", "\u{e9}t\u{e9} ", "\u{65e5}\u{672c} ", "\u{1f600} "];
    let mut text = String::with_capacity(len + 8);
    let mut i = 0;
    while text.len() < len {
        text.push_str(PIECES[i % PIECES.len()]);
        i += 1;
    }
    text
}
