//! UTF-8 and UTF-16LE transcoding over raw byte slices.
//!
//! Decoders never fail: malformed input decodes to [`REPLACEMENT`] and
//! consumes one byte (UTF-8) or one code unit (UTF-16). Encoders report the
//! number of bytes written, zero when the codepoint does not fit the output
//! or cannot be encoded.

use bumpkit_core::{AllocError, Allocator, Block};

/// Codepoint produced for malformed input.
pub const REPLACEMENT: u32 = '?' as u32;

/// A decoded codepoint and the number of input bytes it spanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// The codepoint.
    pub codepoint: u32,
    /// Bytes consumed from the input.
    pub byte_count: usize,
}

impl Decoded {
    const fn malformed(byte_count: usize) -> Self {
        Self {
            codepoint: REPLACEMENT,
            byte_count,
        }
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode one UTF-8 sequence starting at `index`.
///
/// Only the bit layout is checked: overlong forms and encoded surrogates
/// decode to their numeric value.
pub fn decode_utf8(bytes: &[u8], index: usize) -> Decoded {
    let Some(&lead) = bytes.get(index) else {
        return Decoded::malformed(1);
    };
    let tail = &bytes[index + 1..];
    let (len, bits) = match lead {
        b if b & 0x80 == 0x00 => (1, u32::from(b)),
        b if b & 0xE0 == 0xC0 => (2, u32::from(b & 0x1F)),
        b if b & 0xF0 == 0xE0 => (3, u32::from(b & 0x0F)),
        b if b & 0xF8 == 0xF0 => (4, u32::from(b & 0x07)),
        _ => return Decoded::malformed(1),
    };
    let continuation = len - 1;
    if tail.len() < continuation || !tail[..continuation].iter().all(|&b| is_continuation(b)) {
        return Decoded::malformed(1);
    }
    let codepoint = tail[..continuation]
        .iter()
        .fold(bits, |acc, &b| (acc << 6) | u32::from(b & 0x3F));
    Decoded {
        codepoint,
        byte_count: len,
    }
}

/// Encode `codepoint` as UTF-8 into `out` at `index`.
///
/// Returns the bytes written: 1 to 4, or 0 if the sequence does not fit
/// or `codepoint` is above U+10FFFF.
pub fn encode_utf8(out: &mut [u8], index: usize, codepoint: u32) -> usize {
    let len = match codepoint {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        0x1_0000..=0x10_FFFF => 4,
        _ => return 0,
    };
    let Some(dst) = out.get_mut(index..index + len) else {
        return 0;
    };
    match len {
        1 => dst[0] = codepoint as u8,
        2 => {
            dst[0] = 0xC0 | ((codepoint >> 6) & 0x1F) as u8;
            dst[1] = 0x80 | (codepoint & 0x3F) as u8;
        }
        3 => {
            dst[0] = 0xE0 | ((codepoint >> 12) & 0x0F) as u8;
            dst[1] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            dst[2] = 0x80 | (codepoint & 0x3F) as u8;
        }
        _ => {
            dst[0] = 0xF0 | ((codepoint >> 18) & 0x07) as u8;
            dst[1] = 0x80 | ((codepoint >> 12) & 0x3F) as u8;
            dst[2] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            dst[3] = 0x80 | (codepoint & 0x3F) as u8;
        }
    }
    len
}

fn read_unit(bytes: &[u8], index: usize) -> Option<u16> {
    let pair = bytes.get(index..index + 2)?;
    Some(u16::from_le_bytes([pair[0], pair[1]]))
}

/// Decode one UTF-16LE codepoint starting at `index`.
///
/// A high surrogate followed by a low surrogate decodes as a pair. An
/// unpaired surrogate or a trailing odd byte decodes to [`REPLACEMENT`].
pub fn decode_utf16le(bytes: &[u8], index: usize) -> Decoded {
    let Some(lead) = read_unit(bytes, index) else {
        return Decoded::malformed(2);
    };
    match lead {
        0xD800..=0xDBFF => match read_unit(bytes, index + 2) {
            Some(trail @ 0xDC00..=0xDFFF) => Decoded {
                codepoint: 0x1_0000 + ((u32::from(lead & 0x3FF) << 10) | u32::from(trail & 0x3FF)),
                byte_count: 4,
            },
            _ => Decoded::malformed(2),
        },
        0xDC00..=0xDFFF => Decoded::malformed(2),
        unit => Decoded {
            codepoint: u32::from(unit),
            byte_count: 2,
        },
    }
}

/// Encode `codepoint` as UTF-16LE into `out` at `index`.
///
/// Returns the bytes written: 2, 4, or 0 if the units do not fit or the
/// codepoint is a surrogate or above U+10FFFF.
pub fn encode_utf16le(out: &mut [u8], index: usize, codepoint: u32) -> usize {
    match codepoint {
        0..=0xD7FF | 0xE000..=0xFFFF => {
            let Some(dst) = out.get_mut(index..index + 2) else {
                return 0;
            };
            dst.copy_from_slice(&(codepoint as u16).to_le_bytes());
            2
        }
        0x1_0000..=0x10_FFFF => {
            let Some(dst) = out.get_mut(index..index + 4) else {
                return 0;
            };
            let offset = codepoint - 0x1_0000;
            let lead = 0xD800 | ((offset >> 10) & 0x3FF) as u16;
            let trail = 0xDC00 | (offset & 0x3FF) as u16;
            dst[..2].copy_from_slice(&lead.to_le_bytes());
            dst[2..].copy_from_slice(&trail.to_le_bytes());
            4
        }
        _ => 0,
    }
}

/// Transcode UTF-8 `input` to UTF-16LE in a new block of `allocator`.
///
/// Reserves twice the input length, which covers the worst case, and
/// returns the block trimmed to the bytes written.
pub fn utf8_to_utf16le(allocator: &Allocator, input: &[u8]) -> Result<Block, AllocError> {
    transcode(allocator, input, decode_utf8, encode_utf16le)
}

/// Transcode UTF-16LE `input` to UTF-8 in a new block of `allocator`.
///
/// Reserves twice the input length and returns the block trimmed to the
/// bytes written.
pub fn utf16le_to_utf8(allocator: &Allocator, input: &[u8]) -> Result<Block, AllocError> {
    transcode(allocator, input, decode_utf16le, encode_utf8)
}

fn transcode(
    allocator: &Allocator,
    input: &[u8],
    decode: fn(&[u8], usize) -> Decoded,
    encode: fn(&mut [u8], usize, u32) -> usize,
) -> Result<Block, AllocError> {
    if input.is_empty() {
        return Ok(Block::EMPTY);
    }
    let capacity = input.len().checked_mul(2).ok_or(AllocError::OutOfMemory {
        requested: usize::MAX,
    })?;
    let block = allocator.allocate(capacity)?;
    let written = allocator.with_bytes_mut(&block, |out| {
        let mut src = 0;
        let mut dst = 0;
        while src < input.len() {
            let decoded = decode(input, src);
            dst += encode(out, dst, decoded.codepoint);
            src += decoded.byte_count;
        }
        dst
    })?;
    Ok(block.prefix(written))
}
