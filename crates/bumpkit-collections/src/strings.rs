//! Byte-string helpers: trimming, splitting, integer parsing, and a few
//! allocator-backed transforms.
//!
//! The splitting functions take the input as `&mut &[u8]`, return the
//! piece they split off and leave the remainder in the input, so a
//! line-oriented reader can consume a buffer piece by piece:
//!
//! ```
//! use bumpkit_collections::strings::{split_left_on, trim};
//!
//! let mut input: &[u8] = b"STARTCHAR A\nENCODING 65\n";
//! let line = split_left_on(&mut input, b'\n');
//! assert_eq!(trim(line), b"STARTCHAR A");
//! assert_eq!(input, b"ENCODING 65\n");
//! ```

use bumpkit_core::{AllocError, Allocator, Block};

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Strip leading and trailing spaces, tabs, CRs and LFs.
pub fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Split off everything before the first `separator` byte.
///
/// The separator is consumed. Without a separator the whole input is
/// returned and the input is left empty.
pub fn split_left_on<'a>(input: &mut &'a [u8], separator: u8) -> &'a [u8] {
    let bytes = *input;
    match bytes.iter().position(|&b| b == separator) {
        Some(at) => {
            *input = &bytes[at + 1..];
            &bytes[..at]
        }
        None => {
            *input = &bytes[bytes.len()..];
            bytes
        }
    }
}

/// Split off everything before the first occurrence of `separator`.
///
/// Behaves like [`split_left_on`] with a multi-byte separator. An empty
/// separator matches at the start.
pub fn split_left<'a>(input: &mut &'a [u8], separator: &[u8]) -> &'a [u8] {
    let bytes = *input;
    match find(bytes, separator) {
        Some(at) => {
            *input = &bytes[at + separator.len()..];
            &bytes[..at]
        }
        None => {
            *input = &bytes[bytes.len()..];
            bytes
        }
    }
}

/// Split off everything after the last `separator` byte.
///
/// The separator is consumed and the input keeps what precedes it.
/// Without a separator the whole input is returned and the input is left
/// empty.
pub fn split_right_on<'a>(input: &mut &'a [u8], separator: u8) -> &'a [u8] {
    let bytes = *input;
    match bytes.iter().rposition(|&b| b == separator) {
        Some(at) => {
            *input = &bytes[..at];
            &bytes[at + 1..]
        }
        None => {
            *input = &bytes[..0];
            bytes
        }
    }
}

/// Split off everything after the last occurrence of `separator`.
///
/// Behaves like [`split_right_on`] with a multi-byte separator. An empty
/// separator matches at the end.
pub fn split_right<'a>(input: &mut &'a [u8], separator: &[u8]) -> &'a [u8] {
    let bytes = *input;
    match rfind(bytes, separator) {
        Some(at) => {
            *input = &bytes[..at];
            &bytes[at + separator.len()..]
        }
        None => {
            *input = &bytes[..0];
            bytes
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Parse an optionally negative decimal integer at the start of `input`.
///
/// On success the digits (and sign) are consumed. Returns `None`, leaving
/// the input untouched, if no digit follows the optional `-` or the value
/// does not fit an `i64`.
pub fn parse_integer(input: &mut &[u8]) -> Option<i64> {
    let bytes = *input;
    let negative = bytes.first() == Some(&b'-');
    let digits_start = usize::from(negative);
    let digits = bytes[digits_start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for &b in &bytes[digits_start..digits_start + digits] {
        let digit = i64::from(b - b'0');
        value = value.checked_mul(10)?;
        // Accumulate negatives downwards so i64::MIN parses.
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }
    *input = &bytes[digits_start + digits..];
    Some(value)
}

/// Copy `bytes` into a new block of `allocator`.
pub fn copy_bytes(allocator: &Allocator, bytes: &[u8]) -> Result<Block, AllocError> {
    map_bytes(allocator, bytes, |b| b)
}

/// Copy `bytes` into a new block of `allocator` with `A-Z` lowered.
pub fn ascii_to_lower(allocator: &Allocator, bytes: &[u8]) -> Result<Block, AllocError> {
    map_bytes(allocator, bytes, |b| b.to_ascii_lowercase())
}

/// Copy `bytes` into a new block of `allocator` with `a-z` raised.
pub fn ascii_to_upper(allocator: &Allocator, bytes: &[u8]) -> Result<Block, AllocError> {
    map_bytes(allocator, bytes, |b| b.to_ascii_uppercase())
}

fn map_bytes(
    allocator: &Allocator,
    bytes: &[u8],
    f: impl Fn(u8) -> u8,
) -> Result<Block, AllocError> {
    if bytes.is_empty() {
        return Ok(Block::EMPTY);
    }
    let block = allocator.allocate(bytes.len())?;
    allocator.with_bytes_mut(&block, |out| {
        for (dst, &src) in out.iter_mut().zip(bytes) {
            *dst = f(src);
        }
    })?;
    Ok(block)
}

/// Concatenate `parts` into one new block of `allocator`.
pub fn concat(allocator: &Allocator, parts: &[&[u8]]) -> Result<Block, AllocError> {
    let total = parts.iter().map(|p| p.len()).sum();
    if total == 0 {
        return Ok(Block::EMPTY);
    }
    let block = allocator.allocate(total)?;
    let mut at = 0;
    for part in parts {
        allocator.write(&block, at, part)?;
        at += part.len();
    }
    Ok(block)
}
