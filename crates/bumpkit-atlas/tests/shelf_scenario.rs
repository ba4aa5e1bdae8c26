//! Integration test: the 512 x 512 packing scenario.
//!
//! Fills the first shelf exactly, forces a wrap, then overflows the
//! texture and checks the overflow is flagged on the glyph and counted
//! once per atlas, with texture storage in an arena and glyph records on
//! the context's default heap.

use bumpkit_arena::Arena;
use bumpkit_atlas::{AtlasConfig, GlyphAtlas, GlyphMetrics, TextureAtlas};
use bumpkit_collections::TextBuilder;
use bumpkit_test_utils::fixtures::context;

fn glyph(codepoint: u32, width: u16, height: u16) -> GlyphMetrics {
    GlyphMetrics {
        codepoint,
        advance: width,
        x_offset: 0,
        y_offset: 0,
        width,
        height,
    }
}

#[test]
fn first_shelf_fills_exactly_then_wraps() {
    let ctx = context();
    let texture_arena = Arena::new(512 * 512 * 4).unwrap().into_shared();
    let texture_alloc = Arena::allocator(&texture_arena);
    let mut atlas = GlyphAtlas::new(ctx.allocator(), &texture_alloc, &AtlasConfig::default()).unwrap();

    // Widths 1..=31 sum to 496; add 15 for 511 pixels after the default pixel.
    let mut x = 1u16;
    let mut tallest = 1u16;
    for w in (1u16..=31).chain(std::iter::once(15)) {
        let height = 4 + w % 7;
        let placed = atlas.add_glyph(glyph(0x1000 + u32::from(w), w, height), &[]).unwrap();
        assert_eq!(placed.placement(), Some((x, 0)));
        x += w;
        tallest = tallest.max(height);
    }
    assert_eq!(x, 512);

    let wrapped = atlas.add_glyph(glyph(0x2000, 2, 3), &[]).unwrap();
    assert_eq!(wrapped.placement(), Some((0, tallest)));

    let too_tall = atlas.add_glyph(glyph(0x3000, 2, 512), &[]).unwrap();
    assert!(!too_tall.is_placed());
    let also_too_tall = atlas.add_glyph(glyph(0x3001, 2, 600), &[]).unwrap();
    assert!(!also_too_tall.is_placed());

    assert_eq!(atlas.texture().failures(), 2);
    assert_eq!(atlas.unplaced().unwrap(), 2);
    assert_eq!(atlas.len(), 35);
    assert_eq!(texture_arena.borrow().occupied(), 512 * 512 * 4);
}

#[test]
fn bitmap_survives_into_pbm() {
    let ctx = context();
    let mut atlas = GlyphAtlas::new(ctx.allocator(), ctx.allocator(), &AtlasConfig::new(6, 3)).unwrap();
    let placed = atlas
        .add_glyph(glyph(0x21, 3, 2), &[b"A0".as_slice(), b"40".as_slice()])
        .unwrap();
    assert_eq!(placed.placement(), Some((1, 0)));

    let scope = ctx.begin_scope(&[]).unwrap();
    let mut pbm = TextBuilder::new(scope.allocator().clone());
    atlas.texture().append_pbm(&mut pbm).unwrap();
    assert_eq!(
        pbm.to_vec().unwrap(),
        b"P1\n6 3\n 1 1 0 1 0 0\n 0 0 1 0 0 0\n 0 0 0 0 0 0\n"
    );
    scope.end();
}

#[test]
fn standalone_texture_over_scratch() {
    let ctx = context();
    let scope = ctx.begin_scope(&[]).unwrap();
    let mut texture = TextureAtlas::new(scope.allocator(), &AtlasConfig::new(16, 16)).unwrap();
    assert_eq!(texture.place(15, 4), Some((1, 0)));
    assert_eq!(texture.place(16, 4), Some((0, 4)));
    drop(texture);
    scope.end();
    assert_eq!(ctx.scratch_arena(0).unwrap().borrow().occupied(), 0);
}
