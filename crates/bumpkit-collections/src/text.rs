//! Chunked append-only text builder.

use bumpkit_arena::ExecutionContext;
use bumpkit_core::{AllocError, Allocator, Block};
use smallvec::SmallVec;

use crate::error::TextError;
use crate::format::{Arg, Directive, Lookup};

/// Size of every chunk a builder allocates, in bytes.
pub const CHUNK_SIZE: usize = 4096;

const LOWER_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const UPPER_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Clone, Copy, Debug)]
struct Chunk {
    block: Block,
    occupied: usize,
}

/// An append-only byte sequence stored in fixed-size chunks.
///
/// Appends fill the tail chunk and allocate a new one when it is full, so
/// bytes already written are never moved or copied. Chunks come from the
/// builder's allocator. [`materialize`](Self::materialize) copies the
/// content into one contiguous block without touching the chunks.
#[derive(Debug)]
pub struct TextBuilder {
    allocator: Allocator,
    chunks: SmallVec<[Chunk; 4]>,
}

impl TextBuilder {
    /// An empty builder that allocates chunks from `allocator`.
    pub fn new(allocator: Allocator) -> Self {
        Self {
            allocator,
            chunks: SmallVec::new(),
        }
    }

    /// The allocator chunks come from.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Total bytes appended.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.occupied).sum()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|c| c.occupied == 0)
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Append one byte.
    pub fn append_byte(&mut self, byte: u8) -> Result<(), AllocError> {
        self.append_bytes(&[byte])
    }

    /// Append `data`, linking new chunks as the tail fills up.
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<(), AllocError> {
        let mut rest = data;
        while !rest.is_empty() {
            let tail = match self.chunks.last() {
                Some(chunk) if chunk.occupied < CHUNK_SIZE => *chunk,
                _ => self.expand()?,
            };
            let take = (CHUNK_SIZE - tail.occupied).min(rest.len());
            self.allocator
                .write(&tail.block, tail.occupied, &rest[..take])?;
            if let Some(last) = self.chunks.last_mut() {
                last.occupied += take;
            }
            rest = &rest[take..];
        }
        Ok(())
    }

    /// Append UTF-8 text.
    pub fn append_str(&mut self, text: &str) -> Result<(), AllocError> {
        self.append_bytes(text.as_bytes())
    }

    /// Append `value` in `base`, left-padded with `pad` to at least `width`
    /// bytes.
    pub fn append_unsigned(
        &mut self,
        value: u64,
        width: usize,
        pad: u8,
        base: u32,
        uppercase: bool,
    ) -> Result<(), TextError> {
        check_radix(base)?;
        let digits = if uppercase { UPPER_DIGITS } else { LOWER_DIGITS };
        let base = u64::from(base);
        // u64::MAX in base 2 is 64 digits.
        let mut buf = [0u8; 64];
        let mut start = buf.len();
        let mut rest = value;
        loop {
            start -= 1;
            buf[start] = digits[(rest % base) as usize];
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        let len = buf.len() - start;
        for _ in len..width {
            self.append_byte(pad)?;
        }
        self.append_bytes(&buf[start..])?;
        Ok(())
    }

    /// Append `value` in `base`. A minus sign precedes the padding.
    pub fn append_signed(
        &mut self,
        value: i64,
        width: usize,
        pad: u8,
        base: u32,
        uppercase: bool,
    ) -> Result<(), TextError> {
        check_radix(base)?;
        if value < 0 {
            self.append_byte(b'-')?;
        }
        self.append_unsigned(value.unsigned_abs(), width, pad, base, uppercase)
    }

    /// Append `format` with its directives rendered from `args`.
    ///
    /// See [`format`](crate::format) for the directive table. Unknown
    /// directives are copied verbatim. On error, the output rendered before
    /// the failing directive stays in the builder.
    pub fn append_formatted(
        &mut self,
        format: impl AsRef<[u8]>,
        args: &[Arg<'_>],
    ) -> Result<(), TextError> {
        let format = format.as_ref();
        let mut next = 0;
        let mut at = 0;
        while at < format.len() {
            let run = format[at..]
                .iter()
                .position(|&b| b == b'%')
                .unwrap_or(format.len() - at);
            self.append_bytes(&format[at..at + run])?;
            at += run;
            if at == format.len() {
                break;
            }
            match Directive::lookup(&format[at + 1..]) {
                Lookup::Verbatim(span) => {
                    self.append_bytes(&format[at..at + 1 + span])?;
                    at += 1 + span;
                }
                Lookup::Known(directive, spelling) => {
                    self.render(directive, spelling, args, &mut next)?;
                    at += 1 + spelling.len();
                }
            }
        }
        Ok(())
    }

    fn render(
        &mut self,
        directive: Directive,
        spelling: &'static str,
        args: &[Arg<'_>],
        next: &mut usize,
    ) -> Result<(), TextError> {
        let (index, arg) = take(args, next, spelling)?;
        let mismatch = TextError::ArgumentMismatch {
            index,
            directive: spelling,
        };
        match directive {
            Directive::Char => {
                let byte = arg.as_byte().ok_or(mismatch)?;
                self.append_byte(byte)?;
            }
            Directive::Str => {
                let Arg::Str(text) = arg else {
                    return Err(mismatch);
                };
                let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
                self.append_bytes(&text[..end])?;
            }
            Directive::Signed => match arg {
                Arg::Signed(v) => self.append_signed(v, 0, b'0', 10, false)?,
                Arg::Unsigned(v) => self.append_unsigned(v, 0, b'0', 10, false)?,
                Arg::Char(_) | Arg::Str(_) => return Err(mismatch),
            },
            Directive::Unsigned => {
                let value = arg.as_unsigned().ok_or(mismatch)?;
                self.append_unsigned(value, 0, b'0', 10, false)?;
            }
            Directive::Hex { uppercase } => {
                let value = arg.as_unsigned().ok_or(mismatch)?;
                self.append_unsigned(value, 0, b'0', 16, uppercase)?;
            }
            Directive::CountedStr => {
                let count = arg
                    .as_unsigned()
                    .and_then(|c| usize::try_from(c).ok())
                    .ok_or(mismatch)?;
                let (index, data) = take(args, next, spelling)?;
                match data {
                    Arg::Str(text) if count <= text.len() => self.append_bytes(&text[..count])?,
                    _ => {
                        return Err(TextError::ArgumentMismatch {
                            index,
                            directive: spelling,
                        })
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy the content into one freshly allocated block of `allocator`.
    ///
    /// The chunks are left untouched. An empty builder yields
    /// [`Block::EMPTY`] without allocating.
    pub fn materialize(&self, allocator: &Allocator) -> Result<Block, AllocError> {
        let total = self.len();
        if total == 0 {
            return Ok(Block::EMPTY);
        }
        let out = allocator.allocate(total)?;
        let mut at = 0;
        for chunk in &self.chunks {
            self.allocator
                .copy_into(&chunk.block, chunk.occupied, allocator, &out, at)?;
            at += chunk.occupied;
        }
        Ok(out)
    }

    /// Copy the content into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<u8>, AllocError> {
        let mut out = Vec::with_capacity(self.len());
        for chunk in &self.chunks {
            self.allocator.with_bytes(&chunk.block, |bytes| {
                out.extend_from_slice(&bytes[..chunk.occupied]);
            })?;
        }
        Ok(out)
    }

    /// Return every chunk to the builder's allocator.
    pub fn release(self) -> Result<(), AllocError> {
        for chunk in &self.chunks {
            self.allocator.release(chunk.block)?;
        }
        Ok(())
    }

    fn expand(&mut self) -> Result<Chunk, AllocError> {
        let chunk = Chunk {
            block: self.allocator.allocate(CHUNK_SIZE)?,
            occupied: 0,
        };
        self.chunks.push(chunk);
        Ok(chunk)
    }
}

fn check_radix(base: u32) -> Result<(), TextError> {
    if (2..=36).contains(&base) {
        Ok(())
    } else {
        Err(TextError::InvalidRadix(base))
    }
}

fn take<'a>(
    args: &[Arg<'a>],
    next: &mut usize,
    spelling: &'static str,
) -> Result<(usize, Arg<'a>), TextError> {
    let index = *next;
    let arg = args.get(index).copied().ok_or(TextError::MissingArgument {
        index,
        directive: spelling,
    })?;
    *next += 1;
    Ok((index, arg))
}

/// Render `format` into a new block of `allocator`.
///
/// The text is built in a scratch scope that does not conflict with
/// `allocator`; only the final bytes land in `allocator`.
pub fn formatted(
    ctx: &ExecutionContext,
    allocator: &Allocator,
    format: impl AsRef<[u8]>,
    args: &[Arg<'_>],
) -> Result<Block, TextError> {
    let scope = ctx.begin_scope(&[allocator])?;
    let mut builder = TextBuilder::new(scope.allocator().clone());
    builder.append_formatted(format, args)?;
    let block = builder.materialize(allocator)?;
    scope.end();
    Ok(block)
}
