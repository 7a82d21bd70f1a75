use common::{FmtChar, Pos, Span};

use crate::error::ParseError;
use crate::parse::{LitPart, PartialValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;

        match self {
            Sign::Positive => f.write_char('+'),
            Sign::Negative => f.write_char('-'),
        }
    }
}

impl Sign {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Sign::Positive),
            '-' => Some(Sign::Negative),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntPrefix {
    Binary,
    Octal,
    Hexadecimal,
}

impl IntPrefix {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(IntPrefix::Binary),
            'o' => Some(IntPrefix::Octal),
            'x' => Some(IntPrefix::Hexadecimal),
            _ => None,
        }
    }

    pub fn radix(&self) -> u32 {
        match self {
            IntPrefix::Binary => 2,
            IntPrefix::Octal => 8,
            IntPrefix::Hexadecimal => 16,
        }
    }

    pub fn char(&self) -> char {
        match self {
            IntPrefix::Binary => 'b',
            IntPrefix::Octal => 'o',
            IntPrefix::Hexadecimal => 'x',
        }
    }

    pub fn name_capitalized(&self) -> &'static str {
        match self {
            IntPrefix::Binary => "Binary",
            IntPrefix::Octal => "Octal",
            IntPrefix::Hexadecimal => "Hexadecimal",
        }
    }

    pub fn valid_digits(&self) -> &'static str {
        match self {
            IntPrefix::Binary => "`0` and `1`",
            IntPrefix::Octal => "`0-7`",
            IntPrefix::Hexadecimal => "`0-9`, `a-f`, and `A-F`",
        }
    }
}

impl std::fmt::Display for IntPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntPrefix::Binary => f.write_str("binary"),
            IntPrefix::Octal => f.write_str("octal"),
            IntPrefix::Hexadecimal => f.write_str("hexadecimal"),
        }
    }
}

/// Parses a decimal integer or float, or a prefixed integer. The literal is known to start with
/// a digit, or a sign followed by a digit.
pub fn parse_number(lit: &str, span: Span) -> Result<PartialValue, ParseError> {
    let sign = lit.chars().next().and_then(Sign::from_char);
    let body_offset = sign.is_some() as usize;
    let body = &lit[body_offset..];
    let body_pos = span.start.plus(body_offset as u32);

    let mut body_chars = body.chars();
    if let (Some('0'), Some(p)) = (body_chars.next(), body_chars.next()) {
        if let Some(prefix) = IntPrefix::from_char(p) {
            if p.is_ascii_uppercase() {
                return Err(ParseError::UppercaseIntRadix(prefix, body_pos.plus(1)));
            }
            if sign.is_some() {
                return Err(ParseError::PrefixedIntSignNotAllowed(span.start));
            }
            let val = parse_prefixed_int(&body[2..], body_pos.plus(2), span, prefix)?;
            return Ok(PartialValue::Int(val));
        }
    }

    let int_end = body.find(['.', 'e', 'E']).unwrap_or(body.len());
    let integral = &body[..int_end];
    if integral.is_empty() {
        return Err(match sign {
            Some(sign) => ParseError::MissingNumDigitsAfterSign(sign, body_pos),
            None => ParseError::UnexpectedLiteralStart(FmtChar('.'), body_pos),
        });
    }
    validate_digits(integral, body_pos, LitPart::IntOrFloat)?;
    if integral.len() > 1 && integral.starts_with('0') {
        return Err(ParseError::InvalidLeadingZero(body_pos));
    }

    let mut is_float = false;
    let mut rest = &body[int_end..];
    let mut rest_pos = body_pos.plus(int_end as u32);

    if let Some(after_dot) = rest.strip_prefix('.') {
        let frac_end = after_dot.find(['e', 'E']).unwrap_or(after_dot.len());
        let frac = &after_dot[..frac_end];
        let frac_pos = rest_pos.plus(1);
        if frac.is_empty() {
            return Err(ParseError::MissingFloatFractionalPart(frac_pos));
        }
        validate_digits(frac, frac_pos, LitPart::FloatFract)?;

        is_float = true;
        rest = &after_dot[frac_end..];
        rest_pos = frac_pos.plus(frac_end as u32);
    }

    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let exp_sign = exp.chars().next().and_then(Sign::from_char);
        let digits = &exp[exp_sign.is_some() as usize..];
        let digits_pos = rest_pos.plus(1 + exp_sign.is_some() as u32);
        if digits.is_empty() {
            return Err(ParseError::MissingFloatExponent(digits_pos));
        }
        validate_digits(digits, digits_pos, LitPart::FloatExp)?;

        is_float = true;
    }

    if is_float {
        let cleaned = lit.chars().filter(|c| *c != '_').collect::<String>();
        let val = cleaned
            .parse::<f64>()
            .map_err(|_| ParseError::FloatLiteralOverflow(span))?;
        if val.is_infinite() {
            return Err(ParseError::FloatLiteralOverflow(span));
        }
        return Ok(PartialValue::Float(val));
    }

    // accumulate negative numbers downwards so `i64::MIN` doesn't overflow
    let mut accum: i64 = 0;
    for d in integral.bytes().filter(|b| *b != b'_') {
        let digit = (d - b'0') as i64;
        accum = accum
            .checked_mul(10)
            .and_then(|a| match sign {
                Some(Sign::Negative) => a.checked_sub(digit),
                _ => a.checked_add(digit),
            })
            .ok_or(ParseError::IntLiteralOverflow(span))?;
    }
    Ok(PartialValue::Int(accum))
}

fn parse_prefixed_int(
    digits: &str,
    start: Pos,
    span: Span,
    prefix: IntPrefix,
) -> Result<i64, ParseError> {
    let part = LitPart::PrefixedInt(prefix);
    if digits.is_empty() {
        return Err(ParseError::EmptyPrefixedIntValue(span.end));
    }
    validate_underscores(digits, start, part)?;

    let radix = prefix.radix();
    let mut accum: i64 = 0;
    for (i, c) in digits.char_indices() {
        if c == '_' {
            continue;
        }

        let pos = start.plus(i as u32);
        let Some(digit) = c.to_digit(16) else {
            return Err(ParseError::UnexpectedLiteralChar(part, FmtChar(c), pos));
        };
        if digit >= radix {
            return Err(ParseError::IntDigitTooBig(prefix, FmtChar(c), pos));
        }

        accum = accum
            .checked_mul(radix as i64)
            .and_then(|a| a.checked_add(digit as i64))
            .ok_or(ParseError::IntLiteralOverflow(span))?;
    }
    Ok(accum)
}

/// Checks that `s` only consists of decimal digits, with underscores only between digits.
fn validate_digits(s: &str, start: Pos, part: LitPart) -> Result<(), ParseError> {
    if let Some((i, c)) = s.char_indices().find(|(_, c)| !matches!(c, '0'..='9' | '_')) {
        let pos = start.plus(i as u32);
        return Err(ParseError::UnexpectedLiteralChar(part, FmtChar(c), pos));
    }
    validate_underscores(s, start, part)
}

fn validate_underscores(s: &str, start: Pos, part: LitPart) -> Result<(), ParseError> {
    let mut prev_underscore = None;
    for (i, c) in s.char_indices() {
        if c != '_' {
            prev_underscore = None;
            continue;
        }

        let pos = start.plus(i as u32);
        if i == 0 {
            return Err(ParseError::LitStartsWithUnderscore(part, pos));
        }
        if let Some(prev) = prev_underscore {
            let span = Span::new(prev, pos.plus(1));
            return Err(ParseError::ConsecutiveUnderscoresInLiteral(part, span));
        }
        prev_underscore = Some(pos);
    }

    match prev_underscore {
        Some(pos) => Err(ParseError::LitEndsWithUnderscore(part, pos)),
        None => Ok(()),
    }
}
