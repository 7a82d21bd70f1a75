use std::fmt::Write as _;
use std::ops::Deref;

pub mod diagnostic;

/// A half-open range of source text, `start` inclusive and `end` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    #[inline(always)]
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn from_pos_len(start: Pos, len: u32) -> Self {
        Self {
            start,
            end: start.plus(len),
        }
    }

    #[inline(always)]
    pub fn pos(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline(always)]
    pub fn ascii_char(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos.plus(1),
        }
    }

    #[inline(always)]
    pub fn across(a: Self, b: Self) -> Self {
        Self {
            start: a.start,
            end: b.end,
        }
    }

    #[inline(always)]
    pub fn between(a: Self, b: Self) -> Self {
        Self {
            start: a.end,
            end: b.start,
        }
    }

    /// Whether `b` starts exactly where `a` ends, with nothing in between.
    #[inline(always)]
    pub fn adjacent(a: Self, b: Self) -> bool {
        a.end == b.start
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    /// 0-based index of line
    pub line: u32,
    /// utf-8 byte index of line
    pub char: u32,
}

impl Pos {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline(always)]
    pub const fn new(line: u32, char: u32) -> Self {
        Self { line, char }
    }

    #[inline(always)]
    pub fn after(&self, c: char) -> Self {
        self.plus(c.len_utf8() as u32)
    }

    #[inline(always)]
    pub fn plus(&self, n: u32) -> Self {
        Self {
            line: self.line,
            char: self.char + n,
        }
    }

    #[inline(always)]
    pub fn next_line(&self) -> Self {
        Self {
            line: self.line + 1,
            char: 0,
        }
    }

    /// 1-based line number.
    #[inline(always)]
    pub fn line_nr(&self) -> u32 {
        self.line + 1
    }

    /// 1-based column, counted in bytes.
    #[inline(always)]
    pub fn column_nr(&self) -> u32 {
        self.char + 1
    }
}

/// Displays a char with control characters escaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FmtChar(pub char);

impl std::fmt::Display for FmtChar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            '\u{8}' => f.write_str("\\b"),
            '\t' => f.write_str("\\t"),
            '\n' => f.write_str("\\n"),
            '\u{C}' => f.write_str("\\f"),
            '\r' => f.write_str("\\r"),
            '\x00'..='\x1f' | '\x7f' => {
                let control_char = self.0 as u32;
                write!(f, "\\u{control_char:04X}")
            }
            c => f.write_char(c),
        }
    }
}

impl From<char> for FmtChar {
    fn from(value: char) -> Self {
        Self(value)
    }
}

impl Deref for FmtChar {
    type Target = char;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Displays a string with control characters escaped.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FmtStr(pub Box<str>);

impl std::fmt::Display for FmtStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.0.chars() {
            std::fmt::Display::fmt(&FmtChar(c), f)?;
        }
        Ok(())
    }
}

impl FmtStr {
    pub fn from_string(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&str> for FmtStr {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for FmtStr {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl Deref for FmtStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
