use common::{FmtChar, FmtStr, Span};

use crate::datetime::{Date, LocalDateTime, Offset, OffsetDateTime, Time};
use crate::error::ParseError;
use crate::parse::num::{self, IntPrefix, Sign};
use crate::parse::datetime;
use crate::value::Node;

/// A possibly only partially parsed value
#[derive(Clone, Debug, PartialEq)]
pub enum PartialValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    LocalTime(Time),
    LocalDateTime(LocalDateTime),
    OffsetDateTime(OffsetDateTime),
    /// Just the date part, might be followed by the time part. A space may separate the date and
    /// time parts instead of `T`, in which case the time is inside the next token.
    PartialDate(Date),
}

impl PartialValue {
    pub fn from_optional_offset(date: Date, time: Time, offset: Option<Offset>) -> Self {
        match offset {
            Some(offset) => PartialValue::OffsetDateTime(OffsetDateTime::new(date, time, offset)),
            None => PartialValue::LocalDateTime(LocalDateTime::new(date, time)),
        }
    }

    pub fn into_node(self) -> Node {
        match self {
            PartialValue::Float(v) => Node::from(v),
            PartialValue::Int(v) => Node::from(v),
            PartialValue::Bool(v) => Node::from(v),
            PartialValue::LocalTime(v) => Node::from(v),
            PartialValue::LocalDateTime(v) => Node::from(v),
            PartialValue::OffsetDateTime(v) => Node::from(v),
            PartialValue::PartialDate(v) => Node::from(v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitPart {
    Generic,
    IntOrFloat,
    PrefixedInt(IntPrefix),
    FloatFract,
    FloatExp,
}

impl LitPart {
    pub fn to_str(&self) -> &'static str {
        match self {
            LitPart::Generic => "literal",
            LitPart::IntOrFloat => "integer or float",
            LitPart::PrefixedInt(IntPrefix::Binary) => "binary integer",
            LitPart::PrefixedInt(IntPrefix::Octal) => "octal integer",
            LitPart::PrefixedInt(IntPrefix::Hexadecimal) => "hexadecimal integer",
            LitPart::FloatFract => "float fractional part",
            LitPart::FloatExp => "float exponent",
        }
    }
}

impl std::fmt::Display for LitPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

pub fn parse_literal(lit: &str, span: Span) -> Result<PartialValue, ParseError> {
    let mut chars = lit.char_indices();
    let Some((_, c)) = chars.next() else {
        return Err(ParseError::ExpectedValueFound(FmtStr::from("``"), span));
    };

    match c {
        '+' | '-' => {
            let sign = if c == '+' {
                Sign::Positive
            } else {
                Sign::Negative
            };

            match chars.next() {
                Some((_, '0'..='9')) => num::parse_number(lit, span),
                Some((i, c @ ('i' | 'I'))) => {
                    parse_bare_literal(lit, span, i, c, "inf")?;
                    match sign {
                        Sign::Positive => Ok(PartialValue::Float(f64::INFINITY)),
                        Sign::Negative => Ok(PartialValue::Float(f64::NEG_INFINITY)),
                    }
                }
                Some((i, c @ ('n' | 'N'))) => {
                    parse_bare_literal(lit, span, i, c, "nan")?;
                    match sign {
                        Sign::Positive => Ok(PartialValue::Float(f64::NAN)),
                        Sign::Negative => Ok(PartialValue::Float(-f64::NAN)),
                    }
                }
                Some((i, c)) => {
                    let pos = span.start.plus(i as u32);
                    match c {
                        '.' => Err(ParseError::MissingNumDigitsAfterSign(sign, pos)),
                        _ => Err(ParseError::UnexpectedLiteralChar(
                            LitPart::IntOrFloat,
                            FmtChar(c),
                            pos,
                        )),
                    }
                }
                None => Err(ParseError::MissingNumDigitsAfterSign(sign, span.end)),
            }
        }
        '0'..='9' if datetime::is_date_or_time(lit) => datetime::parse_date_time(lit, span),
        '0'..='9' => num::parse_number(lit, span),
        'f' | 'F' => {
            parse_bare_literal(lit, span, 0, c, "false")?;
            Ok(PartialValue::Bool(false))
        }
        't' | 'T' => {
            parse_bare_literal(lit, span, 0, c, "true")?;
            Ok(PartialValue::Bool(true))
        }
        'i' | 'I' => {
            parse_bare_literal(lit, span, 0, c, "inf")?;
            Ok(PartialValue::Float(f64::INFINITY))
        }
        'n' | 'N' => {
            parse_bare_literal(lit, span, 0, c, "nan")?;
            Ok(PartialValue::Float(f64::NAN))
        }
        '_' => Err(ParseError::LitStartsWithUnderscore(
            LitPart::Generic,
            span.start,
        )),
        _ => Err(ParseError::UnexpectedLiteralStart(FmtChar(c), span.start)),
    }
}

/// Checks that `lit[start..]` spells out exactly `expected`, with `first` at `start`.
fn parse_bare_literal(
    lit: &str,
    span: Span,
    start: usize,
    first: char,
    expected: &'static str,
) -> Result<(), ParseError> {
    if first.is_uppercase() {
        let pos = span.start.plus(start as u32);
        return Err(ParseError::UppercaseBareLitChar(FmtChar(first), expected, pos));
    }

    let mut expected_iter = expected.chars().skip(1);
    let rest = lit[start..].char_indices().skip(1);
    for (i, c) in rest.map(|(i, c)| (start + i, c)) {
        let Some(e) = expected_iter.next() else {
            let span = Span::new(span.start.plus(i as u32), span.end);
            let trailing = FmtStr::from(&lit[i..]);
            return Err(ParseError::BareLitTrailingChars(trailing, expected, span));
        };

        if c != e {
            let pos = span.start.plus(i as u32);
            if c.to_ascii_lowercase() == e {
                return Err(ParseError::UppercaseBareLitChar(FmtChar(c), expected, pos));
            } else {
                return Err(ParseError::UnexpectedBareLitChar(FmtChar(c), expected, pos));
            }
        }
    }

    if expected_iter.next().is_some() {
        return Err(ParseError::BareLitMissingChars(expected, span.end));
    }

    Ok(())
}
