//! Criterion micro-benchmarks for text building, transcoding and atlas
//! packing.

use std::hint::black_box;

use bumpkit_arena::ExecutionContext;
use bumpkit_atlas::AtlasConfig;
use bumpkit_bench::{fill_atlas, glyph_profile, sample_text};
use bumpkit_collections::unicode::{utf16le_to_utf8, utf8_to_utf16le};
use bumpkit_collections::{args, formatted, TextBuilder};
use bumpkit_core::{Allocator, HeapAllocator};
use criterion::{criterion_group, criterion_main, Criterion};

fn context() -> ExecutionContext {
    ExecutionContext::new(Allocator::new(HeapAllocator::new()), 4 * 1024 * 1024).unwrap()
}

/// Benchmark: 1K formatted lines appended to one builder, then materialized.
fn bench_append_formatted_1k(c: &mut Criterion) {
    let ctx = context();
    c.bench_function("append_formatted_1k", |b| {
        b.iter(|| {
            let scope = ctx.begin_scope(&[]).unwrap();
            let mut builder = TextBuilder::new(scope.allocator().clone());
            for i in 0..1000u32 {
                builder
                    .append_formatted("STARTCHAR U+%X ENCODING %u BBX %d %d\n", &args![i, i, 8u8, -2i32])
                    .unwrap();
            }
            let block = builder.materialize(scope.allocator()).unwrap();
            black_box(block);
            scope.end();
        });
    });
}

/// Benchmark: the one-shot `formatted` path into the context allocator.
fn bench_formatted_oneshot(c: &mut Criterion) {
    let ctx = context();
    let out = ctx.allocator().clone();
    c.bench_function("formatted_oneshot", |b| {
        b.iter(|| {
            let block = formatted(&ctx, &out, "%s-%zu-%x", &args!["glyph", 4096usize, 255u32]).unwrap();
            out.release(black_box(block)).unwrap();
        });
    });
}

/// Benchmark: UTF-8 to UTF-16LE and back on 64 KiB of mixed text.
fn bench_transcode_64k(c: &mut Criterion) {
    let ctx = context();
    let text = sample_text(64 * 1024);
    c.bench_function("transcode_64k", |b| {
        b.iter(|| {
            let scope = ctx.begin_scope(&[]).unwrap();
            let alloc = scope.allocator();
            let wide = utf8_to_utf16le(alloc, text.as_bytes()).unwrap();
            let wide_bytes = alloc.to_vec(&wide).unwrap();
            let narrow = utf16le_to_utf8(alloc, &wide_bytes).unwrap();
            black_box(narrow);
            scope.end();
        });
    });
}

/// Benchmark: pack 95 printable glyphs into a default atlas.
fn bench_atlas_fill_95(c: &mut Criterion) {
    let alloc = Allocator::new(HeapAllocator::new());
    let glyphs = glyph_profile(95);
    let config = AtlasConfig::default();
    c.bench_function("atlas_fill_95", |b| {
        b.iter(|| {
            let atlas = fill_atlas(&alloc, &config, &glyphs).unwrap();
            black_box(atlas.len());
            atlas.release().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_append_formatted_1k,
    bench_formatted_oneshot,
    bench_transcode_64k,
    bench_atlas_fill_95
);
criterion_main!(benches);
