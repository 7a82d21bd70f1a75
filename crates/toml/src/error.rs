use std::time::Duration;

use common::diagnostic::{Diagnostic, DiagnosticHint};
use common::{FmtChar, FmtStr, Pos, Span};

use crate::datetime::DateTimeField;
use crate::lex::Quote;
use crate::parse::{IntPrefix, LitPart, Sign, MAX_NESTING_DEPTH};
use crate::value::NodeKind;

/// Everything that can go wrong while configuring, reading or parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Timeout(#[from] StreamReadTimeout),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("error reading input: {0}")]
    Io(#[from] std::io::Error),
    /// An invariant of the engine itself was violated. This is never caused by the input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Seconds => f.write_str("s"),
            TimeUnit::Millis => f.write_str("ms"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("read timeout must be positive, got `{value}{unit}`")]
    NonPositiveTimeout { value: i64, unit: TimeUnit },
}

/// A single read from the input didn't complete within the configured duration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no input received within {}ms, after reading {bytes_read} bytes", .timeout.as_millis())]
pub struct StreamReadTimeout {
    pub timeout: Duration,
    pub bytes_read: u64,
}

/// Coarse classification of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lexical,
    Syntax,
    DuplicateKey,
    Redefinition,
    NotATable,
    MixedArray,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidUtf8(Pos),
    LoneCarriageReturn(Pos),
    InvalidCommentChar(FmtChar, Pos),
    InvalidStringChar(Quote, FmtChar, Pos),
    /// The opening quote and the position where the closing quote is missing.
    MissingQuote(Quote, Pos, Pos),
    ExcessiveQuotes(Quote, Span),
    InvalidEscapeChar(FmtChar, Pos),
    InvalidUnicodeEscapeChar(FmtChar, Pos),
    InvalidUnicodeCodepoint(u32, Span),
    InvalidLineEndingEscape(Span),
    UnfinishedEscapeSequence(Span),

    UnexpectedLiteralStart(FmtChar, Pos),
    UnexpectedLiteralChar(LitPart, FmtChar, Pos),
    LitStartsWithUnderscore(LitPart, Pos),
    LitEndsWithUnderscore(LitPart, Pos),
    ConsecutiveUnderscoresInLiteral(LitPart, Span),
    MissingNumDigitsAfterSign(Sign, Pos),
    InvalidLeadingZero(Pos),
    UppercaseBareLitChar(FmtChar, &'static str, Pos),
    UnexpectedBareLitChar(FmtChar, &'static str, Pos),
    BareLitTrailingChars(FmtStr, &'static str, Span),
    BareLitMissingChars(&'static str, Pos),
    MissingFloatFractionalPart(Pos),
    MissingFloatExponent(Pos),
    FloatLiteralOverflow(Span),
    EmptyPrefixedIntValue(Pos),
    PrefixedIntSignNotAllowed(Pos),
    UppercaseIntRadix(IntPrefix, Pos),
    IntDigitTooBig(IntPrefix, FmtChar, Pos),
    IntLiteralOverflow(Span),

    UnexpectedCharInDateTime(FmtChar, Pos),
    DateTimeExpectedCharFound {
        after: DateTimeField,
        expected: FmtChar,
        found: FmtChar,
        pos: Pos,
    },
    DateTimeMissingChar(DateTimeField, FmtChar, Pos),
    DateTimeIncomplete(DateTimeField, Pos),
    DateTimeMissing(DateTimeField, Pos),
    DateTimeOutOfBounds(DateTimeField, u8, (u8, u8), Span),
    DateTimeMissingSubsec(Pos),
    LocalDateTimeOffset(Pos),
    DateAndTimeTooFarApart(Span),

    MultilineStringKey(Quote, Span),
    InvalidCharInIdentifier(FmtChar, Pos),
    ExpectedEqOrDotFound(FmtStr, Span),
    ExpectedRightCurlyFound(FmtStr, Pos, Span),
    ExpectedRightSquareFound(FmtStr, Pos, Span),
    ExpectedKeyFound(FmtStr, Span),
    ExpectedValueFound(FmtStr, Span),
    ExpectedNewlineFound(FmtStr, Span),
    MissingComma(Pos),
    InlineTableTrailingComma(Pos),
    SpaceBetweenArrayPars(Span),
    NestingTooDeep(Span),

    DuplicateKey {
        path: FmtStr,
        orig: Span,
        duplicate: Span,
    },
    TableRedefinition {
        path: FmtStr,
        orig: Span,
        new: Span,
    },
    CannotExtendInlineTable {
        path: FmtStr,
        orig: Span,
        new: Span,
    },
    CannotExtendInlineArray {
        path: FmtStr,
        orig: Span,
        new: Span,
    },
    CannotExtendTableWithDottedKey {
        path: FmtStr,
        orig: Span,
        new: Span,
    },
    CannotExtendArrayWithDottedKey {
        path: FmtStr,
        orig: Span,
        new: Span,
    },
    NotAnArrayOfTables {
        path: FmtStr,
        found: NodeKind,
        orig: Span,
        new: Span,
    },
    NotATable {
        path: FmtStr,
        found: NodeKind,
        orig: Span,
        new: Span,
    },

    MixedArrayTypes {
        expected: NodeKind,
        found: NodeKind,
        first: Span,
        span: Span,
    },
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        use ParseError::*;

        match self {
            MultilineStringKey(..)
            | InvalidCharInIdentifier(..)
            | ExpectedEqOrDotFound(..)
            | ExpectedRightCurlyFound(..)
            | ExpectedRightSquareFound(..)
            | ExpectedKeyFound(..)
            | ExpectedValueFound(..)
            | ExpectedNewlineFound(..)
            | MissingComma(_)
            | InlineTableTrailingComma(_)
            | SpaceBetweenArrayPars(_)
            | NestingTooDeep(_) => ParseErrorKind::Syntax,

            DuplicateKey { .. } => ParseErrorKind::DuplicateKey,

            TableRedefinition { .. }
            | CannotExtendInlineTable { .. }
            | CannotExtendInlineArray { .. }
            | CannotExtendTableWithDottedKey { .. }
            | CannotExtendArrayWithDottedKey { .. }
            | NotAnArrayOfTables { .. } => ParseErrorKind::Redefinition,

            NotATable { .. } => ParseErrorKind::NotATable,

            MixedArrayTypes { .. } => ParseErrorKind::MixedArray,

            _ => ParseErrorKind::Lexical,
        }
    }

    /// 1-based line of the start of the error.
    pub fn line(&self) -> u32 {
        self.span().start.line_nr()
    }

    /// 1-based column of the start of the error, counted in bytes.
    pub fn column(&self) -> u32 {
        self.span().start.column_nr()
    }

    pub fn message(&self) -> String {
        let mut msg = String::new();
        _ = self.description(&mut msg);
        msg
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.description(f)?;
        write!(f, " at line {}, column {}", self.line(), self.column())
    }
}

impl std::error::Error for ParseError {}

impl Diagnostic for ParseError {
    type Hint = Hint;

    fn span(&self) -> Span {
        use ParseError::*;

        match self {
            InvalidUtf8(p) => Span::ascii_char(*p),
            LoneCarriageReturn(p) => Span::ascii_char(*p),
            InvalidCommentChar(_, p) => Span::ascii_char(*p),
            InvalidStringChar(_, _, p) => Span::ascii_char(*p),
            MissingQuote(_, _, p) => Span::pos(*p),
            ExcessiveQuotes(_, s) => *s,
            InvalidEscapeChar(_, p) => Span::ascii_char(*p),
            InvalidUnicodeEscapeChar(_, p) => Span::ascii_char(*p),
            InvalidUnicodeCodepoint(_, s) => *s,
            InvalidLineEndingEscape(s) => *s,
            UnfinishedEscapeSequence(s) => *s,

            UnexpectedLiteralStart(_, p) => Span::ascii_char(*p),
            UnexpectedLiteralChar(_, _, p) => Span::ascii_char(*p),
            LitStartsWithUnderscore(_, p) => Span::ascii_char(*p),
            LitEndsWithUnderscore(_, p) => Span::ascii_char(*p),
            ConsecutiveUnderscoresInLiteral(_, s) => *s,
            MissingNumDigitsAfterSign(_, p) => Span::pos(*p),
            InvalidLeadingZero(p) => Span::ascii_char(*p),
            UppercaseBareLitChar(_, _, p) => Span::ascii_char(*p),
            UnexpectedBareLitChar(_, _, p) => Span::ascii_char(*p),
            BareLitTrailingChars(_, _, s) => *s,
            BareLitMissingChars(_, p) => Span::pos(*p),
            MissingFloatFractionalPart(p) => Span::pos(*p),
            MissingFloatExponent(p) => Span::pos(*p),
            FloatLiteralOverflow(s) => *s,
            EmptyPrefixedIntValue(p) => Span::pos(*p),
            PrefixedIntSignNotAllowed(p) => Span::ascii_char(*p),
            UppercaseIntRadix(_, p) => Span::ascii_char(*p),
            IntDigitTooBig(_, _, p) => Span::ascii_char(*p),
            IntLiteralOverflow(s) => *s,

            UnexpectedCharInDateTime(_, p) => Span::ascii_char(*p),
            DateTimeExpectedCharFound { pos, .. } => Span::ascii_char(*pos),
            DateTimeMissingChar(_, _, p) => Span::pos(*p),
            DateTimeIncomplete(_, p) => Span::pos(*p),
            DateTimeMissing(_, p) => Span::pos(*p),
            DateTimeOutOfBounds(_, _, _, s) => *s,
            DateTimeMissingSubsec(p) => Span::pos(*p),
            LocalDateTimeOffset(p) => Span::ascii_char(*p),
            DateAndTimeTooFarApart(s) => *s,

            MultilineStringKey(_, s) => *s,
            InvalidCharInIdentifier(_, p) => Span::ascii_char(*p),
            ExpectedEqOrDotFound(_, s) => *s,
            ExpectedRightCurlyFound(_, _, s) => *s,
            ExpectedRightSquareFound(_, _, s) => *s,
            ExpectedKeyFound(_, s) => *s,
            ExpectedValueFound(_, s) => *s,
            ExpectedNewlineFound(_, s) => *s,
            MissingComma(p) => Span::pos(*p),
            InlineTableTrailingComma(p) => Span::ascii_char(*p),
            SpaceBetweenArrayPars(s) => *s,
            NestingTooDeep(s) => *s,

            DuplicateKey { duplicate, .. } => *duplicate,
            TableRedefinition { new, .. } => *new,
            CannotExtendInlineTable { new, .. } => *new,
            CannotExtendInlineArray { new, .. } => *new,
            CannotExtendTableWithDottedKey { new, .. } => *new,
            CannotExtendArrayWithDottedKey { new, .. } => *new,
            NotAnArrayOfTables { new, .. } => *new,
            NotATable { new, .. } => *new,

            MixedArrayTypes { span, .. } => *span,
        }
    }

    #[rustfmt::skip]
    fn description(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        use ParseError::*;

        match self {
            InvalidUtf8(_) => write!(f, "Invalid UTF-8 byte sequence"),
            LoneCarriageReturn(_) => write!(f, "Carriage return (`\\r`) is only permitted as part of a line break (`\\r\\n`)"),
            InvalidCommentChar(c, _) => write!(f, "Invalid character `{c}` in comment"),
            InvalidStringChar(quote, c, _) => write!(f, "Invalid character `{c}` in {} string", quote.kind_str()),
            MissingQuote(quote, _, _) => write!(f, "Unterminated string literal, missing `{quote}`"),
            ExcessiveQuotes(quote, _) => write!(f, "Excess quotes, only up to two consecutive quotes (`{}`) are allowed inside a multi-line string", quote.char()),
            InvalidEscapeChar(c, _) => write!(f, "Invalid escape character `{c}`, expected one of: `u`, `U`, `b`, `t`, `n`, `f`, `r`, `\"`, `\\`"),
            InvalidUnicodeEscapeChar(c, _) => write!(f, "Invalid character `{c}` in unicode escape sequence, valid characters are: `a-f`, `A-F` and `0-9`"),
            InvalidUnicodeCodepoint(cp, _) => write!(f, "Invalid unicode scalar `0x{cp:x}` (`{cp}`)"),
            InvalidLineEndingEscape(_) => write!(f, "Invalid line ending backslash, missing newline"),
            UnfinishedEscapeSequence(_) => write!(f, "Unfinished escape sequence"),

            UnexpectedLiteralStart(c, _) => write!(f, "Unexpected character `{c}` at start of literal"),
            UnexpectedLiteralChar(part, c, _) => write!(f, "Unexpected character `{c}` in {part}"),
            LitStartsWithUnderscore(part, _) => write!(f, "The {part} cannot start with an underscore (`_`)"),
            LitEndsWithUnderscore(part, _) => write!(f, "The {part} cannot end with an underscore (`_`)"),
            ConsecutiveUnderscoresInLiteral(part, _) => write!(f, "Consecutive underscores (`_`) are not allowed in the {part}"),
            MissingNumDigitsAfterSign(sign, _) => write!(f, "Missing digit after sign `{sign}`, expected at least one"),
            InvalidLeadingZero(_) => write!(f, "Invalid leading `0` in number"),
            UppercaseBareLitChar(c, expected, _) => write!(f, "Uppercase character `{c}` in literal, expected `{expected}`"),
            UnexpectedBareLitChar(c, expected, _) => write!(f, "Unexpected character `{c}` in literal, expected `{expected}`"),
            BareLitTrailingChars(s, expected, _) => write!(f, "Trailing characters `{s}` in literal, expected `{expected}`"),
            BareLitMissingChars(expected, _) => write!(f, "Missing characters in literal, expected `{expected}`"),
            MissingFloatFractionalPart(_) => write!(f, "Missing fractional part of float literal, expected at least one digit"),
            MissingFloatExponent(_) => write!(f, "Missing float exponent, expected at least one digit"),
            FloatLiteralOverflow(_) => write!(f, "Float literal overflow, number doesn't fit into a 64-bit IEEE float"),
            EmptyPrefixedIntValue(_) => write!(f, "Missing integer digits, expected at least one"),
            PrefixedIntSignNotAllowed(_) => write!(f, "Signs are not permitted for binary, octal, and hexadecimal integers"),
            UppercaseIntRadix(prefix, _) => write!(f, "Found uppercase {prefix} int prefix `{}`, only lowercase `{}` is permitted", prefix.char().to_ascii_uppercase(), prefix.char()),
            IntDigitTooBig(prefix, c, _) => write!(f, "{} digit `{c}` out of range, valid digits are {}", prefix.name_capitalized(), prefix.valid_digits()),
            IntLiteralOverflow(_) => write!(f, "Integer literal overflow, number doesn't fit into a 64-bit signed integer"),

            UnexpectedCharInDateTime(c, _) => write!(f, "Unexpected character `{c}` in date-time"),
            DateTimeExpectedCharFound { after, expected, found, .. } => write!(f, "Unexpected character `{found}` in date-time after {after}, expected `{expected}`"),
            DateTimeMissingChar(field, expected, _) => write!(f, "Incomplete date-time, missing character `{expected}` after {field}"),
            DateTimeIncomplete(field, _) => write!(f, "Incomplete date-time, {field} is missing digits"),
            DateTimeMissing(field, _) => write!(f, "Incomplete date-time, missing {field}"),
            DateTimeOutOfBounds(field, val, (min, max), _) => write!(f, "Date-time {field} `{val}` out of range, the valid range is `{min}..={max}`"),
            DateTimeMissingSubsec(_) => write!(f, "Missing date-time fractional second, expected at least one digit"),
            LocalDateTimeOffset(_) => write!(f, "Local time doesn't permit an offset"),
            DateAndTimeTooFarApart(_) => write!(f, "Date and time too far apart, they may only be separated by exactly one space"),

            MultilineStringKey(quote, _) => write!(f, "Multi-line strings cannot be used as keys, found `{quote}`"),
            InvalidCharInIdentifier(c, _) => write!(f, "Invalid character `{c}` in identifier, valid characters are: `a-z`, `A-Z`, `0-9`, `_` and `-`"),
            ExpectedEqOrDotFound(token, _) => write!(f, "Expected `=` or `.`, found {token}"),
            ExpectedRightCurlyFound(token, _, _) => write!(f, "Expected `}}`, found {token}"),
            ExpectedRightSquareFound(token, _, _) => write!(f, "Expected `]`, found {token}"),
            ExpectedKeyFound(token, _) => write!(f, "Expected a key, found {token}"),
            ExpectedValueFound(token, _) => write!(f, "Expected a value, found {token}"),
            ExpectedNewlineFound(token, _) => write!(f, "Expected a line break, found {token}"),
            MissingComma(_) => write!(f, "Missing comma (`,`)"),
            InlineTableTrailingComma(_) => write!(f, "Trailing commas aren't permitted in inline tables"),
            SpaceBetweenArrayPars(_) => write!(f, "No space allowed between array header brackets"),
            NestingTooDeep(_) => write!(f, "Arrays and inline tables may only be nested {MAX_NESTING_DEPTH} levels deep"),

            DuplicateKey { path, .. } => write!(f, "Duplicate key `{path}`"),
            TableRedefinition { path, .. } => write!(f, "Table `{path}` is defined more than once"),
            CannotExtendInlineTable { path, .. } => write!(f, "Cannot extend inline table `{path}`"),
            CannotExtendInlineArray { path, .. } => write!(f, "Cannot extend inline array `{path}`"),
            CannotExtendTableWithDottedKey { path, .. } => write!(f, "Cannot extend table `{path}` with dotted key"),
            CannotExtendArrayWithDottedKey { path, .. } => write!(f, "Cannot extend array `{path}` with dotted key"),
            NotAnArrayOfTables { path, found, .. } => write!(f, "Cannot append to `{path}`, it is a {found} not an array of tables"),
            NotATable { path, found, .. } => write!(f, "Cannot use `{path}` as a table, it is a {found}"),

            MixedArrayTypes { expected, found, .. } => write!(f, "Mixed types in array, expected {expected} found {found}"),
        }
    }

    #[rustfmt::skip]
    fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        use ParseError::*;

        match self {
            InvalidUtf8(_) => write!(f, "Invalid UTF-8"),
            LoneCarriageReturn(_) => write!(f, "Lone carriage return"),
            InvalidCommentChar(..) => write!(f, "Invalid character"),
            InvalidStringChar(..) => write!(f, "Invalid character"),
            MissingQuote(quote, _, _) => write!(f, "Missing `{quote}`"),
            ExcessiveQuotes(..) => write!(f, "Excess quotes"),
            InvalidEscapeChar(..) => write!(f, "Invalid escape character"),
            InvalidUnicodeEscapeChar(..) => write!(f, "Invalid unicode escape character"),
            InvalidUnicodeCodepoint(..) => write!(f, "Invalid unicode scalar"),
            InvalidLineEndingEscape(_) => write!(f, "Invalid line ending backslash"),
            UnfinishedEscapeSequence(_) => write!(f, "Unfinished escape sequence"),

            UnexpectedLiteralStart(..) => write!(f, "Unexpected character"),
            UnexpectedLiteralChar(part, _, _) => write!(f, "Unexpected character in {part}"),
            LitStartsWithUnderscore(..) => write!(f, "Leading underscore"),
            LitEndsWithUnderscore(..) => write!(f, "Trailing underscore"),
            ConsecutiveUnderscoresInLiteral(..) => write!(f, "Consecutive underscores"),
            MissingNumDigitsAfterSign(..) => write!(f, "Missing digit after sign"),
            InvalidLeadingZero(_) => write!(f, "Invalid leading `0`"),
            UppercaseBareLitChar(..) => write!(f, "Uppercase character"),
            UnexpectedBareLitChar(..) => write!(f, "Unexpected character"),
            BareLitTrailingChars(..) => write!(f, "Trailing characters"),
            BareLitMissingChars(..) => write!(f, "Missing characters"),
            MissingFloatFractionalPart(_) => write!(f, "Missing fractional part"),
            MissingFloatExponent(_) => write!(f, "Missing exponent"),
            FloatLiteralOverflow(_) => write!(f, "Float literal overflow"),
            EmptyPrefixedIntValue(_) => write!(f, "Missing integer digits"),
            PrefixedIntSignNotAllowed(_) => write!(f, "Sign not allowed"),
            UppercaseIntRadix(..) => write!(f, "Uppercase radix"),
            IntDigitTooBig(..) => write!(f, "Digit out of range"),
            IntLiteralOverflow(_) => write!(f, "Integer literal overflow"),

            UnexpectedCharInDateTime(..) => write!(f, "Unexpected character"),
            DateTimeExpectedCharFound { expected, .. } => write!(f, "Expected `{expected}`"),
            DateTimeMissingChar(_, expected, _) => write!(f, "Missing `{expected}`"),
            DateTimeIncomplete(..) => write!(f, "Missing digits"),
            DateTimeMissing(field, _) => write!(f, "Missing {field}"),
            DateTimeOutOfBounds(field, ..) => write!(f, "Invalid {field}"),
            DateTimeMissingSubsec(_) => write!(f, "Missing fractional second"),
            LocalDateTimeOffset(_) => write!(f, "Offset not permitted"),
            DateAndTimeTooFarApart(_) => write!(f, "Too far apart"),

            MultilineStringKey(..) => write!(f, "Not a valid key"),
            InvalidCharInIdentifier(..) => write!(f, "Invalid character"),
            ExpectedEqOrDotFound(..) => write!(f, "Expected `=` or `.`"),
            ExpectedRightCurlyFound(..) => write!(f, "Expected `}}`"),
            ExpectedRightSquareFound(..) => write!(f, "Expected `]`"),
            ExpectedKeyFound(..) => write!(f, "Expected a key"),
            ExpectedValueFound(..) => write!(f, "Expected a value"),
            ExpectedNewlineFound(..) => write!(f, "Expected a line break"),
            MissingComma(_) => write!(f, "Missing comma (`,`)"),
            InlineTableTrailingComma(_) => write!(f, "Trailing comma"),
            SpaceBetweenArrayPars(_) => write!(f, "No space allowed"),
            NestingTooDeep(_) => write!(f, "Nested too deeply"),

            DuplicateKey { .. } => write!(f, "Duplicate key"),
            TableRedefinition { .. } => write!(f, "Table redefined"),
            CannotExtendInlineTable { .. } => write!(f, "Cannot extend inline table"),
            CannotExtendInlineArray { .. } => write!(f, "Cannot extend inline array"),
            CannotExtendTableWithDottedKey { .. } => write!(f, "Cannot extend table with dotted key"),
            CannotExtendArrayWithDottedKey { .. } => write!(f, "Cannot extend array with dotted key"),
            NotAnArrayOfTables { found, .. } => write!(f, "Not an array of tables, but a {found}"),
            NotATable { found, .. } => write!(f, "Not a table, but a {found}"),

            MixedArrayTypes { found, .. } => write!(f, "Found {found}"),
        }
    }

    fn hint(&self) -> Option<Self::Hint> {
        use ParseError::*;

        match self {
            MissingQuote(_, start, _) => Some(Hint::LiteralStart(*start)),
            ExpectedRightCurlyFound(_, l_par, _) => Some(Hint::LeftCurly(*l_par)),
            ExpectedRightSquareFound(_, l_par, _) => Some(Hint::LeftSquare(*l_par)),
            DuplicateKey { orig, .. } => Some(Hint::OriginalKey(*orig)),
            TableRedefinition { orig, .. }
            | CannotExtendInlineTable { orig, .. }
            | CannotExtendTableWithDottedKey { orig, .. }
            | NotATable { orig, .. } => Some(Hint::OriginalTable(*orig)),
            CannotExtendInlineArray { orig, .. }
            | CannotExtendArrayWithDottedKey { orig, .. }
            | NotAnArrayOfTables { orig, .. } => Some(Hint::OriginalValue(*orig)),
            MixedArrayTypes { first, .. } => Some(Hint::FirstElement(*first)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    LiteralStart(Pos),
    LeftCurly(Pos),
    LeftSquare(Pos),
    OriginalKey(Span),
    OriginalTable(Span),
    OriginalValue(Span),
    FirstElement(Span),
}

impl DiagnosticHint for Hint {
    fn span(&self) -> Span {
        match self {
            Hint::LiteralStart(p) => Span::ascii_char(*p),
            Hint::LeftCurly(p) => Span::ascii_char(*p),
            Hint::LeftSquare(p) => Span::ascii_char(*p),
            Hint::OriginalKey(s) => *s,
            Hint::OriginalTable(s) => *s,
            Hint::OriginalValue(s) => *s,
            Hint::FirstElement(s) => *s,
        }
    }

    fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        match self {
            Hint::LiteralStart(_) => write!(f, "Literal started here"),
            Hint::LeftCurly(_) => write!(f, "Left `{{` defined here"),
            Hint::LeftSquare(_) => write!(f, "Left `[` defined here"),
            Hint::OriginalKey(_) => write!(f, "Original key defined here"),
            Hint::OriginalTable(_) => write!(f, "Original table defined here"),
            Hint::OriginalValue(_) => write!(f, "Original value defined here"),
            Hint::FirstElement(_) => write!(f, "First element defined here"),
        }
    }
}
