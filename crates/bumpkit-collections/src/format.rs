//! The `%`-directive mini-language used by
//! [`TextBuilder::append_formatted`](crate::TextBuilder::append_formatted).
//!
//! | Directive | Argument | Output |
//! |---|---|---|
//! | `%c` | byte | the byte |
//! | `%s` | text | bytes up to the first NUL |
//! | `%d` `%i` `%zd` `%zi` | integer | signed decimal |
//! | `%u` `%zu` | non-negative integer | unsigned decimal |
//! | `%x` `%zx` | non-negative integer | lowercase hex |
//! | `%X` `%zX` | non-negative integer | uppercase hex |
//! | `%.*s` | count, then text | exactly `count` bytes of the text |
//!
//! Anything else after `%` is copied to the output verbatim, `%` included.
//! Unknown directives are never errors.

/// One formatting argument.
///
/// Build with `From` (integers, `&str`, byte slices) or the
/// [`args!`](crate::args) macro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arg<'a> {
    /// A single byte, for `%c`.
    Char(u8),
    /// Text, for `%s` and the data half of `%.*s`.
    Str(&'a [u8]),
    /// A signed integer.
    Signed(i64),
    /// An unsigned integer.
    Unsigned(u64),
}

impl Arg<'_> {
    /// The argument as a byte, if it is one or an integer in `0..=255`.
    pub(crate) fn as_byte(&self) -> Option<u8> {
        match *self {
            Self::Char(c) => Some(c),
            Self::Signed(v) => u8::try_from(v).ok(),
            Self::Unsigned(v) => u8::try_from(v).ok(),
            Self::Str(_) => None,
        }
    }

    /// The argument as a non-negative integer.
    pub(crate) fn as_unsigned(&self) -> Option<u64> {
        match *self {
            Self::Signed(v) => u64::try_from(v).ok(),
            Self::Unsigned(v) => Some(v),
            Self::Char(_) | Self::Str(_) => None,
        }
    }
}

macro_rules! arg_from_int {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Self::$variant(value as $wide)
                }
            }
        )*
    };
}

arg_from_int!(Signed as i64: i8, i16, i32, i64, isize);
arg_from_int!(Unsigned as u64: u8, u16, u32, u64, usize);

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value.as_bytes())
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Str(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Str(value)
    }
}

/// Build an array of [`Arg`]s from heterogeneous values.
///
/// ```
/// use bumpkit_collections::{args, Arg};
///
/// let args = args![255u32, "name", -3i32];
/// assert_eq!(args[1], Arg::Str(b"name"));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Arg::from($arg)),*]
    };
}

/// What a recognized directive renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `%c`
    Char,
    /// `%s`
    Str,
    /// `%d`, `%i`, `%zd`, `%zi`
    ///
    /// The `z` forms keep the sign: `%zd` of `-1` renders `-1`, not the
    /// unsigned size-type wraparound C tools print. Use `%zu` for unsigned
    /// output.
    Signed,
    /// `%u`, `%zu`
    Unsigned,
    /// `%x`, `%X`, `%zx`, `%zX`
    Hex {
        /// Whether digits above 9 are uppercase.
        uppercase: bool,
    },
    /// `%.*s`
    CountedStr,
}

/// Directive spellings, as they follow the `%`.
const TABLE: &[(&str, Directive)] = &[
    ("c", Directive::Char),
    ("s", Directive::Str),
    ("d", Directive::Signed),
    ("i", Directive::Signed),
    ("u", Directive::Unsigned),
    ("x", Directive::Hex { uppercase: false }),
    ("X", Directive::Hex { uppercase: true }),
    ("zd", Directive::Signed),
    ("zi", Directive::Signed),
    ("zu", Directive::Unsigned),
    ("zx", Directive::Hex { uppercase: false }),
    ("zX", Directive::Hex { uppercase: true }),
    (".*s", Directive::CountedStr),
];

/// Outcome of looking up the bytes that follow a `%`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A directive and the spelling that matched it.
    Known(Directive, &'static str),
    /// Not a directive. The given number of bytes after `%` are to be
    /// copied verbatim along with the `%`.
    Verbatim(usize),
}

impl Directive {
    /// Match the bytes after a `%` against the directive table.
    ///
    /// On a miss, the verbatim span covers the longest partial spelling
    /// (`z`, `.`, `.*`) plus the one byte that broke it, if any.
    pub fn lookup(rest: &[u8]) -> Lookup {
        if let Some(&(spelling, directive)) = TABLE
            .iter()
            .find(|(spelling, _)| rest.starts_with(spelling.as_bytes()))
        {
            return Lookup::Known(directive, spelling);
        }
        let partial = TABLE
            .iter()
            .map(|(spelling, _)| common_prefix(spelling.as_bytes(), rest))
            .max()
            .unwrap_or(0);
        Lookup::Verbatim((partial + 1).min(rest.len()))
    }

    /// Number of arguments the directive consumes.
    pub fn arity(self) -> usize {
        match self {
            Self::CountedStr => 2,
            _ => 1,
        }
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
