//! Texture and glyph atlases.

use std::mem::size_of;

use bumpkit_collections::{args, GrowableBuffer, TextBuilder};
use bumpkit_core::{Allocator, Block};
use indexmap::IndexMap;

use crate::config::AtlasConfig;
use crate::error::AtlasError;
use crate::glyph::{Glyph, GlyphMetrics};
use crate::packer::ShelfPacker;

/// Pixel value of a set bitmap bit and of the reserved default pixel.
pub const OPAQUE: u32 = 0xFFFF_FFFF;

/// A fixed-size `u32` texture plus the shelf packer that fills it.
///
/// Pixels live in one block of the allocator passed at construction,
/// usually an arena that outlives the atlas's users. The texture starts
/// cleared except for pixel (0, 0), which is [`OPAQUE`] and never packed
/// over.
///
/// When [`place`](Self::place) first runs out of room it logs an error;
/// later failures are only counted.
#[derive(Debug)]
pub struct TextureAtlas {
    allocator: Allocator,
    pixels: Block,
    width: u32,
    height: u32,
    packer: ShelfPacker,
    failures: usize,
}

impl TextureAtlas {
    /// Allocate and clear a texture sized by `config`.
    pub fn new(allocator: &Allocator, config: &AtlasConfig) -> Result<Self, AtlasError> {
        config.validate()?;
        let bytes = config.pixel_bytes().ok_or(AtlasError::OutOfBounds {
            x: 0,
            y: 0,
            width: config.width,
            height: config.height,
        })?;
        let pixels = allocator.allocate(bytes)?;
        allocator.with_bytes_mut(&pixels, |out| {
            out.fill(0);
            out[..size_of::<u32>()].copy_from_slice(&OPAQUE.to_ne_bytes());
        })?;
        Ok(Self {
            allocator: allocator.clone(),
            pixels,
            width: config.width,
            height: config.height,
            packer: ShelfPacker::with_reserved_origin(config.width, config.height),
            failures: 0,
        })
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packer's current state.
    pub fn packer(&self) -> &ShelfPacker {
        &self.packer
    }

    /// The pixel block.
    pub fn pixel_block(&self) -> Block {
        self.pixels
    }

    /// Number of rectangles that found no room.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Reserve a `width` x `height` rectangle in the texture.
    pub fn place(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let placed = self.packer.place(width, height);
        if placed.is_none() {
            if self.failures == 0 {
                tracing::error!(
                    texture_width = self.width,
                    texture_height = self.height,
                    glyph_width = width,
                    glyph_height = height,
                    "texture with size {} x {} is not big enough to hold all glyphs",
                    self.width,
                    self.height
                );
            }
            self.failures += 1;
        }
        placed
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * size_of::<u32>()
    }

    fn check_rect(&self, x: u32, y: u32, width: u32, height: u32) -> Result<(), AtlasError> {
        let fits = |start: u32, len: u32, edge: u32| start.checked_add(len).is_some_and(|end| end <= edge);
        if fits(x, width, self.width) && fits(y, height, self.height) {
            Ok(())
        } else {
            Err(AtlasError::OutOfBounds {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// The pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<u32, AtlasError> {
        self.check_rect(x, y, 1, 1)?;
        let mut raw = [0u8; 4];
        self.allocator.read(&self.pixels, self.offset(x, y), &mut raw)?;
        Ok(u32::from_ne_bytes(raw))
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> Result<Vec<u32>, AtlasError> {
        self.check_rect(0, y, self.width, 1)?;
        let start = self.offset(0, y);
        let len = self.width as usize * size_of::<u32>();
        let row = self.allocator.with_bytes(&self.pixels, |bytes| {
            bytes[start..start + len]
                .chunks_exact(size_of::<u32>())
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect()
        })?;
        Ok(row)
    }

    /// Draw 1-bit-per-pixel bitmap rows into the rectangle at `(x, y)`.
    ///
    /// Each row is hex text, two digits per byte, most significant bit
    /// leftmost; a row of a `width`-pixel bitmap spans `(width + 7) / 8`
    /// bytes. Set bits become [`OPAQUE`], clear bits 0. Missing rows and
    /// missing digits count as zero, as do non-hex characters.
    pub fn blit_hex_rows(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rows: &[&[u8]],
    ) -> Result<(), AtlasError> {
        self.check_rect(x, y, width, height)?;
        let stride = (width as usize).div_ceil(8);
        let mut decoded = vec![0u8; stride];
        for row in 0..height {
            let text = rows.get(row as usize).copied().unwrap_or_default();
            for (i, byte) in decoded.iter_mut().enumerate() {
                let hi = text.get(2 * i).map_or(0, |&c| hex_value(c));
                let lo = text.get(2 * i + 1).map_or(0, |&c| hex_value(c));
                *byte = (hi << 4) | lo;
            }
            let start = self.offset(x, y + row);
            self.allocator.with_bytes_mut(&self.pixels, |bytes| {
                let dst = &mut bytes[start..start + width as usize * size_of::<u32>()];
                for (px, pixel) in dst.chunks_exact_mut(size_of::<u32>()).enumerate() {
                    let bit = decoded[px / 8] & (0x80 >> (px % 8));
                    let value = if bit != 0 { OPAQUE } else { 0 };
                    pixel.copy_from_slice(&value.to_ne_bytes());
                }
            })?;
        }
        Ok(())
    }

    /// Render the texture as a plain PBM (`P1`) image: nonzero pixels are
    /// 1, zero pixels 0.
    pub fn append_pbm(&self, out: &mut TextBuilder) -> Result<(), AtlasError> {
        out.append_formatted("P1\n%u %u\n", &args![self.width, self.height])?;
        for y in 0..self.height {
            // The builder may share our allocator, so copy the row out first.
            let row = self.row(y)?;
            for pixel in row {
                out.append_bytes(if pixel != 0 { b" 1" } else { b" 0" })?;
            }
            out.append_byte(b'\n')?;
        }
        Ok(())
    }

    /// Hand the pixel block back to its allocator.
    pub fn release(self) -> Result<(), AtlasError> {
        self.allocator.release(self.pixels)?;
        Ok(())
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Glyph records, their codepoint index, and the texture they pack into.
#[derive(Debug)]
pub struct GlyphAtlas {
    allocator: Allocator,
    glyphs: GrowableBuffer<Glyph>,
    index: IndexMap<u32, usize>,
    texture: TextureAtlas,
}

impl GlyphAtlas {
    /// An empty atlas. Records grow in `allocator`; the texture is
    /// allocated from `texture_allocator`.
    pub fn new(
        allocator: &Allocator,
        texture_allocator: &Allocator,
        config: &AtlasConfig,
    ) -> Result<Self, AtlasError> {
        Ok(Self {
            allocator: allocator.clone(),
            glyphs: GrowableBuffer::new(),
            index: IndexMap::new(),
            texture: TextureAtlas::new(texture_allocator, config)?,
        })
    }

    /// Append a glyph record, pack its bitmap and draw `rows` into place.
    ///
    /// Returns the stored record. When the texture has no room the record
    /// is kept but left unplaced. A repeated codepoint gets a new record
    /// and the index points at the newest one.
    pub fn add_glyph(
        &mut self,
        metrics: GlyphMetrics,
        rows: &[&[u8]],
    ) -> Result<Glyph, AtlasError> {
        let slot = self.glyphs.append(&self.allocator)?;
        let mut glyph = Glyph::from_metrics(metrics);
        let (width, height) = (u32::from(metrics.width), u32::from(metrics.height));
        if let Some((u, v)) = self.texture.place(width, height) {
            self.texture.blit_hex_rows(u, v, width, height, rows)?;
            // Placements lie inside the texture, whose edges fit u16 coordinates.
            glyph.place_at(u as u16, v as u16);
        }
        self.glyphs.set(slot, glyph)?;
        self.index.insert(metrics.codepoint, slot);
        Ok(glyph)
    }

    /// The record for `codepoint`, if one was added.
    pub fn glyph(&self, codepoint: u32) -> Result<Option<Glyph>, AtlasError> {
        match self.index.get(&codepoint) {
            Some(&slot) => Ok(self.glyphs.get(slot)?),
            None => Ok(None),
        }
    }

    /// Number of records added.
    pub fn len(&self) -> usize {
        self.glyphs.count()
    }

    /// Whether no glyph was added.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Distinct codepoints in the order they were first added.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.index.keys().copied()
    }

    /// All records in insertion order.
    pub fn glyphs(&self) -> Result<Vec<Glyph>, AtlasError> {
        Ok(self.glyphs.to_vec()?)
    }

    /// Number of records without a place in the texture.
    pub fn unplaced(&self) -> Result<usize, AtlasError> {
        Ok(self.glyphs()?.iter().filter(|g| !g.is_placed()).count())
    }

    /// The texture.
    pub fn texture(&self) -> &TextureAtlas {
        &self.texture
    }

    /// Release the record buffer and the texture.
    pub fn release(self) -> Result<(), AtlasError> {
        self.glyphs.release()?;
        self.texture.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpkit_test_utils::fixtures::{arena, heap};

    fn metrics(codepoint: u32, width: u16, height: u16) -> GlyphMetrics {
        GlyphMetrics {
            codepoint,
            advance: width,
            width,
            height,
            ..GlyphMetrics::default()
        }
    }

    #[test]
    fn new_texture_has_only_default_pixel() {
        let (_, alloc) = arena(1 << 12);
        let atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(8, 4)).unwrap();
        assert_eq!(atlas.pixel(0, 0).unwrap(), OPAQUE);
        assert_eq!(atlas.pixel(1, 0).unwrap(), 0);
        assert_eq!(atlas.pixel(7, 3).unwrap(), 0);
        assert!(atlas.pixel(8, 0).is_err());
        assert_eq!(atlas.packer().cursor(), (1, 0));
    }

    #[test]
    fn texture_reuses_dirty_arena_memory_cleanly() {
        let (shared, alloc) = arena(1 << 12);
        let dirty = alloc.allocate(1 << 12).unwrap();
        alloc.with_bytes_mut(&dirty, |b| b.fill(0x5A)).unwrap();
        shared.borrow_mut().clear();
        let atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(16, 16)).unwrap();
        assert_eq!(atlas.row(5).unwrap(), vec![0; 16]);
    }

    #[test]
    fn too_small_arena_reports_alloc_error() {
        let (_, alloc) = arena(64);
        let err = TextureAtlas::new(&alloc, &AtlasConfig::default()).unwrap_err();
        assert!(matches!(err, AtlasError::Alloc(_)));
    }

    #[test]
    fn blit_decodes_msb_first() {
        let alloc = heap();
        let mut atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(12, 4)).unwrap();
        // 10 pixels wide: two bytes per row.
        atlas
            .blit_hex_rows(1, 1, 10, 2, &[b"A5C0", b"ff"])
            .unwrap();
        let row = atlas.row(1).unwrap();
        let bits: Vec<u8> = row.iter().map(|&p| u8::from(p == OPAQUE)).collect();
        assert_eq!(bits, vec![0, 1, 0, 1, 0, 0, 1, 0, 1, 1, 1, 0]);
        let row = atlas.row(2).unwrap();
        let bits: Vec<u8> = row.iter().map(|&p| u8::from(p == OPAQUE)).collect();
        assert_eq!(bits, vec![0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn blit_missing_rows_are_blank() {
        let alloc = heap();
        let mut atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(8, 8)).unwrap();
        atlas.blit_hex_rows(0, 2, 8, 3, &[b"FF"]).unwrap();
        assert_eq!(atlas.row(2).unwrap(), vec![OPAQUE; 8]);
        assert_eq!(atlas.row(3).unwrap(), vec![0; 8]);
    }

    #[test]
    fn blit_outside_texture_is_rejected() {
        let alloc = heap();
        let mut atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(8, 8)).unwrap();
        assert_eq!(
            atlas.blit_hex_rows(4, 0, 5, 1, &[]),
            Err(AtlasError::OutOfBounds {
                x: 4,
                y: 0,
                width: 5,
                height: 1
            })
        );
    }

    #[test]
    fn pbm_marks_opaque_pixels() {
        let alloc = heap();
        let mut atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(3, 2)).unwrap();
        atlas.blit_hex_rows(1, 1, 2, 1, &[b"40"]).unwrap();
        let mut out = TextBuilder::new(alloc.clone());
        atlas.append_pbm(&mut out).unwrap();
        assert_eq!(out.to_vec().unwrap(), b"P1\n3 2\n 1 0 0\n 0 0 1\n");
    }

    #[test]
    fn failures_are_counted() {
        let alloc = heap();
        let mut atlas = TextureAtlas::new(&alloc, &AtlasConfig::new(4, 4)).unwrap();
        assert!(atlas.place(5, 1).is_none());
        assert!(atlas.place(5, 1).is_none());
        assert_eq!(atlas.failures(), 2);
    }

    #[test]
    fn glyph_atlas_places_and_indexes() {
        let alloc = heap();
        let (_, texture_alloc) = arena(1 << 16);
        let mut atlas = GlyphAtlas::new(&alloc, &texture_alloc, &AtlasConfig::new(32, 32)).unwrap();
        let a = atlas.add_glyph(metrics(0x41, 4, 2), &[b"F0", b"90"]).unwrap();
        assert_eq!(a.placement(), Some((1, 0)));
        assert_eq!(atlas.texture().pixel(4, 0).unwrap(), OPAQUE);
        assert_eq!(atlas.texture().pixel(5, 0).unwrap(), 0);
        assert_eq!(atlas.texture().pixel(2, 1).unwrap(), 0);
        assert_eq!(atlas.glyph(0x41).unwrap(), Some(a));
        assert_eq!(atlas.glyph(0x42).unwrap(), None);
    }

    #[test]
    fn empty_glyph_atlas_has_no_records() {
        let alloc = heap();
        let atlas = GlyphAtlas::new(&alloc, &alloc, &AtlasConfig::new(8, 8)).unwrap();
        assert!(atlas.is_empty());
        assert_eq!(atlas.glyphs().unwrap(), Vec::new());
        assert_eq!(atlas.unplaced().unwrap(), 0);
        assert_eq!(atlas.glyph(0x41).unwrap(), None);
        atlas.release().unwrap();
    }

    #[test]
    fn glyph_without_room_stays_unplaced() {
        let alloc = heap();
        let mut atlas = GlyphAtlas::new(&alloc, &alloc, &AtlasConfig::new(8, 8)).unwrap();
        let big = atlas.add_glyph(metrics(0x57, 4, 9), &[]).unwrap();
        assert!(!big.is_placed());
        assert_eq!((big.u, big.v), (0, 0));
        assert_eq!(atlas.len(), 1);
        assert_eq!(atlas.unplaced().unwrap(), 1);
        assert_eq!(atlas.texture().failures(), 1);
    }

    #[test]
    fn repeated_codepoint_points_at_newest() {
        let alloc = heap();
        let mut atlas = GlyphAtlas::new(&alloc, &alloc, &AtlasConfig::new(64, 64)).unwrap();
        atlas.add_glyph(metrics(0x61, 2, 2), &[]).unwrap();
        atlas.add_glyph(metrics(0x62, 2, 2), &[]).unwrap();
        let newer = atlas.add_glyph(metrics(0x61, 3, 3), &[]).unwrap();
        assert_eq!(atlas.len(), 3);
        assert_eq!(atlas.glyph(0x61).unwrap(), Some(newer));
        assert_eq!(atlas.codepoints().collect::<Vec<_>>(), vec![0x61, 0x62]);
    }

    #[test]
    fn release_returns_storage() {
        let (source, counted) = bumpkit_test_utils::CountingSource::shared();
        let mut atlas = GlyphAtlas::new(&counted, &counted, &AtlasConfig::new(8, 8)).unwrap();
        atlas.add_glyph(metrics(0x41, 2, 2), &[]).unwrap();
        atlas.release().unwrap();
        assert_eq!(source.borrow().live_bytes(), 0);
    }
}
