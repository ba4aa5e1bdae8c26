//! Integration test: a converter-shaped pipeline over the collections.
//!
//! Reads a small line-oriented input with the byte-string helpers, collects
//! records in a growable buffer, and renders a header through the
//! formatter, staging in scratch and landing the result in an arena.

use bumpkit_collections::strings::{parse_integer, split_left_on, trim};
use bumpkit_collections::unicode::{utf16le_to_utf8, utf8_to_utf16le};
use bumpkit_collections::{args, formatted, GrowableBuffer, TextBuilder};
use bumpkit_test_utils::fixtures::{arena, context};

const INPUT: &[u8] = b"\
CHAR 65 8\n\
CHAR 66 7\n\
  CHAR 67 9  \n\
COMMENT ignored\n\
CHAR 68 6\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
struct Record {
    codepoint: u32,
    advance: u32,
}

fn parse_records(ctx_alloc: &bumpkit_core::Allocator) -> GrowableBuffer<Record> {
    let mut records = GrowableBuffer::new();
    let mut input = INPUT;
    while !input.is_empty() {
        let mut line = trim(split_left_on(&mut input, b'\n'));
        if split_left_on(&mut line, b' ') != b"CHAR" {
            continue;
        }
        let codepoint = parse_integer(&mut line).unwrap();
        let mut rest = trim(line);
        let advance = parse_integer(&mut rest).unwrap();
        records
            .push(
                ctx_alloc,
                Record {
                    codepoint: codepoint as u32,
                    advance: advance as u32,
                },
            )
            .unwrap();
    }
    records
}

#[test]
fn parse_collect_and_render() {
    let ctx = context();
    let records = parse_records(ctx.allocator());
    assert_eq!(records.count(), 4);
    assert_eq!(records.allocated(), 4);

    let (shared, out) = arena(1 << 16);
    let scope = ctx.begin_scope(&[&out]).unwrap();
    let mut body = TextBuilder::new(scope.allocator().clone());
    for record in records.iter().unwrap() {
        body.append_formatted("%c:%u;", &args![record.codepoint, record.advance])
            .unwrap();
    }
    let body_block = body.materialize(&out).unwrap();
    scope.end();

    let header = formatted(&ctx, &out, "%zu glyphs, widest %X\n", &args![4usize, 9u32]).unwrap();
    assert_eq!(out.to_vec(&header).unwrap(), b"4 glyphs, widest 9\n");
    assert_eq!(out.to_vec(&body_block).unwrap(), b"A:8;B:7;C:9;D:6;");

    // Only the two results live in the destination arena.
    let used = shared.borrow().occupied();
    assert!(used <= body_block.len() + header.len() + 8);

    records.release().unwrap();
}

#[test]
fn transcode_rendered_text() {
    let ctx = context();
    let alloc = ctx.allocator();
    let label = formatted(&ctx, alloc, "%s \u{263A}", &args!["smile"]).unwrap();
    let text = alloc.to_vec(&label).unwrap();
    let wide = utf8_to_utf16le(alloc, &text).unwrap();
    let back = utf16le_to_utf8(alloc, &alloc.to_vec(&wide).unwrap()).unwrap();
    assert_eq!(alloc.to_vec(&back).unwrap(), "smile \u{263A}".as_bytes());
}
