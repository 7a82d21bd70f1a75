use std::iter::Peekable;
use std::ops::RangeInclusive;
use std::str::CharIndices;

use common::{FmtChar, Pos, Span};

use crate::datetime::{self, Date, DateTimeField, DateTimeField::*, Offset, Time};
use crate::error::ParseError;
use crate::parse::PartialValue;

pub type CharIter<'a> = Peekable<CharIndices<'a>>;

/// Whether the literal starts like a date (`dddd-`) or a time (`dd:`).
pub fn is_date_or_time(lit: &str) -> bool {
    let b = lit.as_bytes();
    let digits = |n: usize| b.len() > n && b[..n].iter().all(u8::is_ascii_digit);
    (digits(4) && b[4] == b'-') || (digits(2) && b[2] == b':')
}

/// Parses a date-time literal, the literal has to pass [`is_date_or_time`].
pub fn parse_date_time(lit: &str, span: Span) -> Result<PartialValue, ParseError> {
    let mut chars = lit.char_indices().peekable();
    let (two_digits, two_digits_span) =
        expect_two_digit_num(&mut chars, [], span).map_err(|e| e.kind(Year))?;

    if let Some((_, ':')) = chars.peek() {
        chars.next();
        (two_digits, two_digits_span)
            .check_range(0..=23)
            .map_err(|e| e.kind(Hour))?;

        let time = continue_parsing_time(&mut chars, span, two_digits)?;
        error_on_offset(&mut chars, span)?;
        return Ok(PartialValue::LocalTime(time));
    }

    let (low_digits, _) = expect_two_digit_num(&mut chars, ['-'], span).map_err(|e| e.kind(Year))?;
    let year = 100 * two_digits as u16 + low_digits as u16;

    expect_char(&mut chars, span, Year, '-')?;

    continue_parsing_date_time_after_year(&mut chars, span, year)
}

/// Continue parsing this date-time after the `-` separator following the year.
fn continue_parsing_date_time_after_year(
    chars: &mut CharIter,
    span: Span,
    year: u16,
) -> Result<PartialValue, ParseError> {
    let (month, _) = expect_two_digit_num(chars, ['-'], span)
        .map_err(|e| e.kind(Month))?
        .check_range(1..=12)
        .map_err(|e| e.kind(Month))?;

    expect_char(chars, span, Month, '-')?;

    let max_day = datetime::days_in_month(year, month);
    let (day, _) = expect_two_digit_num(chars, ['T', 't'], span)
        .map_err(|e| e.kind(Day))?
        .check_range(1..=max_day)
        .map_err(|e| e.kind(Day))?;

    let date = Date { year, month, day };

    let (time, offset) = match chars.next() {
        Some((_, 'T' | 't')) => parse_time_and_offset(chars, span)?,
        Some((i, c)) => {
            let pos = span.start.plus(i as u32);
            return match c {
                '0'..='9' => Err(ParseError::DateTimeMissingChar(Day, FmtChar('T'), pos)),
                _ => Err(ParseError::UnexpectedCharInDateTime(FmtChar(c), pos)),
            };
        }
        None => return Ok(PartialValue::PartialDate(date)),
    };

    Ok(PartialValue::from_optional_offset(date, time, offset))
}

/// Parses the time following a date, either after the `T` or as a separate literal.
pub fn parse_time_and_offset(
    chars: &mut CharIter,
    span: Span,
) -> Result<(Time, Option<Offset>), ParseError> {
    let time = {
        let (hour, _) = expect_two_digit_num(chars, [':'], span)
            .map_err(|e| e.kind(Hour))?
            .check_range(0..=23)
            .map_err(|e| e.kind(Hour))?;

        expect_char(chars, span, Hour, ':')?;

        continue_parsing_time(chars, span, hour)?
    };

    let offset = try_to_parse_offset(chars, span)?;
    if let Some((i, c)) = chars.next() {
        return unexpected_char_error(c, span, i);
    }

    Ok((time, offset))
}

/// Parses minutes, seconds and the optional fraction. Stops in front of an offset, the caller
/// decides whether one is permitted.
fn continue_parsing_time(chars: &mut CharIter, span: Span, hour: u8) -> Result<Time, ParseError> {
    let (minute, _) = expect_two_digit_num(chars, [':'], span)
        .map_err(|e| e.kind(Minute))?
        .check_range(0..=59)
        .map_err(|e| e.kind(Minute))?;

    expect_char(chars, span, Minute, ':')?;

    let (second, _) = expect_two_digit_num(chars, ['Z', 'z', '+', '-', '.'], span)
        .map_err(|e| e.kind(Second))?
        .check_range(0..=59)
        .map_err(|e| e.kind(Second))?;

    let mut nanos = 0;
    if let Some(&(i, '.')) = chars.peek() {
        chars.next();
        nanos = parse_subsec(chars, span, span.start.plus(i as u32 + 1))?;
    }

    match chars.peek() {
        Some((_, 'Z' | 'z' | '+' | '-')) | None => (),
        Some(&(i, c)) => return unexpected_char_error(c, span, i),
    }

    Ok(Time {
        hour,
        minute,
        second,
        nanos,
    })
}

/// Up to 9 digits are significant, any further digits are truncated.
fn parse_subsec(chars: &mut CharIter, span: Span, start: Pos) -> Result<u32, ParseError> {
    let mut subsec_digits = 0;
    let mut subsec = 0;
    while let Some(&(i, c)) = chars.peek() {
        match c {
            '0'..='9' => {
                if subsec_digits < 9 {
                    subsec *= 10;
                    subsec += c as u32 - '0' as u32;
                    subsec_digits += 1;
                }
                chars.next();
            }
            'Z' | 'z' | '+' | '-' => break,
            _ => return unexpected_char_error(c, span, i),
        }
    }

    if subsec_digits == 0 {
        return Err(ParseError::DateTimeMissingSubsec(start));
    }

    Ok(subsec * 10_u32.pow(9 - subsec_digits))
}

fn try_to_parse_offset(chars: &mut CharIter, span: Span) -> Result<Option<Offset>, ParseError> {
    match chars.next() {
        Some((_, 'Z' | 'z')) => Ok(Some(Offset::Utc)),
        Some((_, '+')) => {
            let minutes = parse_offset(chars, span)?;
            Ok(Some(Offset::Custom(minutes)))
        }
        Some((_, '-')) => {
            let minutes = parse_offset(chars, span)?;
            Ok(Some(Offset::Custom(-minutes)))
        }
        Some((i, c)) => unexpected_char_error(c, span, i),
        None => Ok(None),
    }
}

fn parse_offset(chars: &mut CharIter, span: Span) -> Result<i16, ParseError> {
    let (hour, _) = expect_two_digit_num(chars, [':'], span)
        .map_err(|e| e.kind(OffsetHour))?
        .check_range(0..=23)
        .map_err(|e| e.kind(OffsetHour))?;

    expect_char(chars, span, OffsetHour, ':')?;

    let (minute, _) = expect_two_digit_num(chars, [], span)
        .map_err(|e| e.kind(OffsetMinute))?
        .check_range(0..=59)
        .map_err(|e| e.kind(OffsetMinute))?;

    Ok(60 * hour as i16 + minute as i16)
}

fn error_on_offset(chars: &mut CharIter, span: Span) -> Result<(), ParseError> {
    match chars.next() {
        Some((i, c)) => {
            let pos = span.start.plus(i as u32);
            match c {
                'Z' | 'z' | '+' | '-' => Err(ParseError::LocalDateTimeOffset(pos)),
                _ => Err(ParseError::UnexpectedCharInDateTime(FmtChar(c), pos)),
            }
        }
        None => Ok(()),
    }
}

fn unexpected_char_error<T>(char: char, span: Span, offset: usize) -> Result<T, ParseError> {
    let pos = span.start.plus(offset as u32);
    Err(ParseError::UnexpectedCharInDateTime(FmtChar(char), pos))
}

fn expect_char(
    chars: &mut CharIter,
    span: Span,
    after: DateTimeField,
    expected: char,
) -> Result<(), ParseError> {
    match chars.next() {
        Some((_, c)) if c == expected => Ok(()),
        Some((i, c)) => Err(ParseError::DateTimeExpectedCharFound {
            after,
            expected: FmtChar(expected),
            found: FmtChar(c),
            pos: span.start.plus(i as u32),
        }),
        None => Err(ParseError::DateTimeMissingChar(
            after,
            FmtChar(expected),
            span.end,
        )),
    }
}

struct ExpectNumError(ExpectNumErrorKind, Pos);

enum ExpectNumErrorKind {
    Incomplete,
    Missing,
    Invalid(char),
}

impl ExpectNumError {
    fn kind(self, field: DateTimeField) -> ParseError {
        match self.0 {
            ExpectNumErrorKind::Incomplete => ParseError::DateTimeIncomplete(field, self.1),
            ExpectNumErrorKind::Missing => ParseError::DateTimeMissing(field, self.1),
            ExpectNumErrorKind::Invalid(c) => {
                ParseError::UnexpectedCharInDateTime(FmtChar(c), self.1)
            }
        }
    }
}

/// `next` lists the characters that may follow the number, finding one of them early means
/// digits are missing rather than the input being garbage.
fn expect_two_digit_num<const SIZE: usize>(
    chars: &mut CharIter,
    next: [char; SIZE],
    span: Span,
) -> Result<(u8, Span), ExpectNumError> {
    use ExpectNumErrorKind::*;

    let Some((start_offset, c)) = chars.next() else {
        return Err(ExpectNumError(Missing, span.end));
    };
    let d0 = match c {
        '0'..='9' => c as u8 - b'0',
        _ => {
            let pos = span.start.plus(start_offset as u32);
            return if next.contains(&c) {
                Err(ExpectNumError(Missing, pos))
            } else {
                Err(ExpectNumError(Invalid(c), pos))
            };
        }
    };

    let Some(&(i, c)) = chars.peek() else {
        return Err(ExpectNumError(Incomplete, span.end));
    };
    let d1 = match c {
        '0'..='9' => c as u8 - b'0',
        _ => {
            let pos = span.start.plus(i as u32);
            return if next.contains(&c) {
                Err(ExpectNumError(Incomplete, pos))
            } else {
                Err(ExpectNumError(Invalid(c), pos))
            };
        }
    };
    chars.next();

    let start = span.start.plus(start_offset as u32);
    Ok((10 * d0 + d1, Span::from_pos_len(start, 2)))
}

struct NumRangeError(u8, RangeInclusive<u8>, Span);

impl NumRangeError {
    fn kind(self, field: DateTimeField) -> ParseError {
        let range = (*self.1.start(), *self.1.end());
        ParseError::DateTimeOutOfBounds(field, self.0, range, self.2)
    }
}

trait NumRangeCheck: Sized {
    fn check_range(self, range: RangeInclusive<u8>) -> Result<Self, NumRangeError>;
}

impl NumRangeCheck for (u8, Span) {
    fn check_range(self, range: RangeInclusive<u8>) -> Result<Self, NumRangeError> {
        if !range.contains(&self.0) {
            return Err(NumRangeError(self.0, range, self.1));
        }
        Ok(self)
    }
}
