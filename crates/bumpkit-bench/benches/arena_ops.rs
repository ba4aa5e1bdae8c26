//! Criterion micro-benchmarks for arena and scratch-scope operations.

use std::hint::black_box;

use bumpkit_arena::{Arena, ExecutionContext};
use bumpkit_collections::GrowableBuffer;
use bumpkit_core::{Allocator, HeapAllocator};
use criterion::{criterion_group, criterion_main, Criterion};

const ARENA_BYTES: usize = 1024 * 1024;

/// Benchmark: 1K small bump allocations followed by a clear.
fn bench_arena_alloc_1k(c: &mut Criterion) {
    let mut arena = Arena::new(ARENA_BYTES).unwrap();
    c.bench_function("arena_alloc_1k", |b| {
        b.iter(|| {
            for i in 0..1000usize {
                black_box(arena.alloc(1 + i % 64).unwrap());
            }
            arena.clear();
        });
    });
}

/// Benchmark: repeatedly growing the most recent block in place.
fn bench_arena_realloc_chain(c: &mut Criterion) {
    let mut arena = Arena::new(ARENA_BYTES).unwrap();
    c.bench_function("arena_realloc_chain", |b| {
        b.iter(|| {
            let mut block = arena.alloc(16).unwrap();
            for size in (32..=4096).step_by(32) {
                block = arena.realloc(block, size).unwrap();
            }
            black_box(block);
            arena.clear();
        });
    });
}

/// Benchmark: open a scratch scope, allocate a little, close it.
fn bench_scratch_scope(c: &mut Criterion) {
    let ctx = ExecutionContext::new(Allocator::new(HeapAllocator::new()), ARENA_BYTES).unwrap();
    c.bench_function("scratch_scope_cycle", |b| {
        b.iter(|| {
            let scope = ctx.begin_scope(&[]).unwrap();
            black_box(scope.allocator().allocate(256).unwrap());
            scope.end();
        });
    });
}

/// Benchmark: nested scopes that must alternate pool slots.
fn bench_scratch_nested(c: &mut Criterion) {
    let ctx = ExecutionContext::new(Allocator::new(HeapAllocator::new()), ARENA_BYTES).unwrap();
    c.bench_function("scratch_scope_nested", |b| {
        b.iter(|| {
            let outer = ctx.begin_scope(&[]).unwrap();
            let inner = ctx.begin_scope(&[outer.allocator()]).unwrap();
            black_box(inner.allocator().allocate(64).unwrap());
            inner.end();
            outer.end();
        });
    });
}

/// Benchmark: 10K appends into a growable buffer living in scratch.
fn bench_buffer_push_10k(c: &mut Criterion) {
    let ctx = ExecutionContext::new(Allocator::new(HeapAllocator::new()), ARENA_BYTES).unwrap();
    c.bench_function("buffer_push_10k", |b| {
        b.iter(|| {
            let scope = ctx.begin_scope(&[]).unwrap();
            let mut buffer = GrowableBuffer::<u32>::new();
            for i in 0..10_000u32 {
                buffer.push(scope.allocator(), i).unwrap();
            }
            black_box(buffer.count());
            scope.end();
        });
    });
}

criterion_group!(
    benches,
    bench_arena_alloc_1k,
    bench_arena_realloc_chain,
    bench_scratch_scope,
    bench_scratch_nested,
    bench_buffer_push_10k
);
criterion_main!(benches);
