use std::collections::VecDeque;

use common::{FmtChar, Pos, Span};

use crate::error::{Error, ParseError};
use crate::reader::{SliceSource, Source};

#[cfg(test)]
mod test;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub ty: TokenType,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenType {
    String(StringToken),
    /// Bare keys, numbers, booleans and date-times. Dots always split literals, the parser
    /// recombines adjacent parts.
    LiteralOrIdent(String),
    /// Contains all the text following a `#` excluding the line break.
    Comment(String),
    SquareLeft,
    SquareRight,
    CurlyLeft,
    CurlyRight,
    Equal,
    Comma,
    Dot,
    Newline,
    EOF,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringToken {
    pub quote: Quote,
    /// The text with escape sequences evaluated.
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    /// "
    Basic,
    /// """
    BasicMultiline,
    /// '
    Literal,
    /// '''
    LiteralMultiline,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quote::Basic => f.write_str("\""),
            Quote::BasicMultiline => f.write_str("\"\"\""),
            Quote::Literal => f.write_str("'"),
            Quote::LiteralMultiline => f.write_str("'''"),
        }
    }
}

impl Quote {
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic | Self::BasicMultiline)
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::BasicMultiline | Self::LiteralMultiline)
    }

    pub fn char(&self) -> char {
        match self {
            Quote::Basic | Quote::BasicMultiline => '"',
            Quote::Literal | Quote::LiteralMultiline => '\'',
        }
    }

    pub fn multiline(&self) -> Self {
        match self {
            Quote::Basic | Quote::BasicMultiline => Self::BasicMultiline,
            Quote::Literal | Quote::LiteralMultiline => Self::LiteralMultiline,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Quote::Basic => "basic",
            Quote::BasicMultiline => "multi-line basic",
            Quote::Literal => "literal",
            Quote::LiteralMultiline => "multi-line literal",
        }
    }
}

/// Escapes a string so it can be embedded in a basic string literal.
///
/// Quotes and backslashes are escaped, as are all control characters. The common ones use their
/// short form (`\n`), the rest are written as `\uXXXX`.
pub fn escape_string(s: &str) -> String {
    use std::fmt::Write as _;

    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{8}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{C}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            '\x00'..='\x1f' | '\x7f' => {
                _ = write!(escaped, "\\u{:04X}", c as u32);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Tokenizes a complete in-memory input, the returned tokens end with [`TokenType::EOF`].
pub fn lex(input: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(SliceSource::new(input.as_bytes()));
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let eof = token.ty == TokenType::EOF;
        tokens.push(token);
        if eof {
            return Ok(tokens);
        }
    }
}

/// Pulls bytes from a [`Source`] on demand, decodes them and produces one token at a time.
#[derive(Debug)]
pub struct Lexer<S> {
    source: S,
    /// Decoded but not yet consumed chars.
    lookahead: VecDeque<char>,
    /// Position of the next char to be consumed.
    pos: Pos,
    /// Position after the last decoded char.
    decode_pos: Pos,
    /// Whether a tab directly preceded the last token.
    skipped_tab: bool,
}

impl<S: Source> Lexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::with_capacity(4),
            pos: Pos::ZERO,
            decode_pos: Pos::ZERO,
            skipped_tab: false,
        }
    }

    /// Decodes chars until `n` are buffered or the input ends.
    fn fill(&mut self, n: usize) -> Result<(), Error> {
        while self.lookahead.len() < n {
            match self.decode_char()? {
                Some(c) => {
                    self.decode_pos = advance(self.decode_pos, c);
                    self.lookahead.push_back(c);
                }
                None => break,
            }
        }
        Ok(())
    }

    fn decode_char(&mut self) -> Result<Option<char>, Error> {
        let Some(b0) = self.source.next_byte()? else {
            return Ok(None);
        };
        let len = match b0 {
            0x00..=0x7f => return Ok(Some(b0 as char)),
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Err(ParseError::InvalidUtf8(self.decode_pos).into()),
        };

        let mut buf = [b0, 0, 0, 0];
        for b in buf.iter_mut().take(len).skip(1) {
            match self.source.next_byte()? {
                Some(byte) => *b = byte,
                None => return Err(ParseError::InvalidUtf8(self.decode_pos).into()),
            }
        }
        match std::str::from_utf8(&buf[..len]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Err(ParseError::InvalidUtf8(self.decode_pos).into()),
        }
    }

    #[inline]
    fn peek(&mut self) -> Result<Option<char>, Error> {
        self.fill(1)?;
        Ok(self.lookahead.front().copied())
    }

    #[inline]
    fn peek2(&mut self) -> Result<Option<char>, Error> {
        self.fill(2)?;
        Ok(self.lookahead.get(1).copied())
    }

    #[inline]
    fn next(&mut self) -> Result<Option<char>, Error> {
        self.fill(1)?;
        let c = self.lookahead.pop_front();
        if let Some(c) = c {
            self.pos = advance(self.pos, c);
        }
        Ok(c)
    }

    #[inline]
    fn eat(&mut self, expected: char) -> Result<bool, Error> {
        if self.peek()? == Some(expected) {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn skipped_tab(&self) -> bool {
        self.skipped_tab
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skipped_tab = false;
        loop {
            let start = self.pos;
            let Some(c) = self.peek()? else {
                return Ok(Token {
                    ty: TokenType::EOF,
                    span: Span::pos(start),
                });
            };

            let ty = match c {
                ' ' => {
                    self.skipped_tab = false;
                    self.next()?;
                    continue;
                }
                '\t' => {
                    self.skipped_tab = true;
                    self.next()?;
                    continue;
                }
                '\n' => {
                    self.next()?;
                    return Ok(Token {
                        ty: TokenType::Newline,
                        span: Span::ascii_char(start),
                    });
                }
                '\r' => {
                    self.next()?;
                    if !self.eat('\n')? {
                        return Err(ParseError::LoneCarriageReturn(start).into());
                    }
                    return Ok(Token {
                        ty: TokenType::Newline,
                        span: Span::from_pos_len(start, 2),
                    });
                }
                '"' | '\'' => {
                    self.next()?;
                    return self.string(c, start);
                }
                '#' => {
                    self.next()?;
                    return self.comment(start);
                }
                '[' => TokenType::SquareLeft,
                ']' => TokenType::SquareRight,
                '{' => TokenType::CurlyLeft,
                '}' => TokenType::CurlyRight,
                '=' => TokenType::Equal,
                '.' => TokenType::Dot,
                ',' => TokenType::Comma,
                _ => return self.literal(start),
            };

            self.next()?;
            return Ok(Token {
                ty,
                span: Span::ascii_char(start),
            });
        }
    }

    fn literal(&mut self, start: Pos) -> Result<Token, Error> {
        let mut lit = String::new();
        while let Some(c) = self.peek()? {
            match c {
                ' ' | '\t' | '\n' | '\r' | '"' | '\'' | '#' | '[' | ']' | '{' | '}' | '=' | '.'
                | ',' => break,
                _ => {
                    lit.push(c);
                    self.next()?;
                }
            }
        }
        Ok(Token {
            ty: TokenType::LiteralOrIdent(lit),
            span: Span::new(start, self.pos),
        })
    }

    fn comment(&mut self, start: Pos) -> Result<Token, Error> {
        let mut text = String::new();
        while let Some(c) = self.peek()? {
            match c {
                '\n' => break,
                '\r' if self.peek2()? == Some('\n') => break,
                '\t' => (),
                '\x00'..='\x1f' | '\x7f' => {
                    return Err(ParseError::InvalidCommentChar(FmtChar(c), self.pos).into());
                }
                _ => (),
            }
            text.push(c);
            self.next()?;
        }
        Ok(Token {
            ty: TokenType::Comment(text),
            span: Span::new(start, self.pos),
        })
    }

    /// Lexes a string after its first quote char has been consumed.
    fn string(&mut self, quote_char: char, start: Pos) -> Result<Token, Error> {
        let mut quote = match quote_char {
            '"' => Quote::Basic,
            _ => Quote::Literal,
        };

        if self.eat(quote_char)? {
            if !self.eat(quote_char)? {
                // just an empty string
                return Ok(Token {
                    ty: TokenType::String(StringToken {
                        quote,
                        text: String::new(),
                    }),
                    span: Span::new(start, self.pos),
                });
            }

            quote = quote.multiline();

            // > A newline immediately following the opening delimiter will be trimmed
            match self.peek()? {
                Some('\n') => {
                    self.next()?;
                }
                Some('\r') if self.peek2()? == Some('\n') => {
                    self.next()?;
                    self.next()?;
                }
                _ => (),
            }
        }

        let mut text = String::new();
        loop {
            let pos = self.pos;
            let Some(c) = self.next()? else {
                return Err(ParseError::MissingQuote(quote, start, pos).into());
            };

            match c {
                _ if c == quote_char => {
                    if self.string_closing_quote(quote, &mut text)? {
                        break;
                    }
                }
                '\\' if quote.is_basic() => self.string_escape(quote, &mut text, pos)?,
                '\n' if quote.is_multiline() => text.push('\n'),
                '\r' if quote.is_multiline() && self.peek()? == Some('\n') => (),
                '\n' | '\r' if !quote.is_multiline() && (c == '\n' || self.peek()? == Some('\n')) => {
                    return Err(ParseError::MissingQuote(quote, start, pos).into());
                }
                '\t' => text.push(c),
                '\x00'..='\x1f' | '\x7f' => {
                    return Err(ParseError::InvalidStringChar(quote, FmtChar(c), pos).into());
                }
                _ => text.push(c),
            }
        }

        Ok(Token {
            ty: TokenType::String(StringToken { quote, text }),
            span: Span::new(start, self.pos),
        })
    }

    /// Handles a quote char inside a string. Returns `true` if it closed the string.
    fn string_closing_quote(&mut self, quote: Quote, text: &mut String) -> Result<bool, Error> {
        if !quote.is_multiline() {
            return Ok(true);
        }

        let q = quote.char();
        if !self.eat(q)? {
            text.push(q);
            return Ok(false);
        }
        if !self.eat(q)? {
            text.push(q);
            text.push(q);
            return Ok(false);
        }

        // up to 2 quotes are allowed at the end of multi-line strings
        for _ in 0..2 {
            if self.eat(q)? {
                text.push(q);
            }
        }

        if self.peek()? == Some(q) {
            let start = self.pos;
            while self.eat(q)? {}
            let span = Span::new(start, self.pos);
            return Err(ParseError::ExcessiveQuotes(quote, span).into());
        }

        Ok(true)
    }

    fn string_escape(&mut self, quote: Quote, text: &mut String, esc_start: Pos) -> Result<(), Error> {
        let pos = self.pos;
        let Some(c) = self.next()? else {
            let span = Span::new(esc_start, self.pos);
            return Err(ParseError::UnfinishedEscapeSequence(span).into());
        };

        match c {
            'u' => return self.string_escape_unicode(text, esc_start, 4),
            'U' => return self.string_escape_unicode(text, esc_start, 8),
            'b' => text.push('\u{8}'),
            't' => text.push('\t'),
            'n' => text.push('\n'),
            'f' => text.push('\u{C}'),
            'r' => text.push('\r'),
            '"' => text.push('"'),
            '\\' => text.push('\\'),
            ' ' | '\t' | '\r' | '\n' => {
                if !quote.is_multiline() {
                    let span = Span::new(esc_start, pos);
                    return Err(ParseError::UnfinishedEscapeSequence(span).into());
                }
                if c == '\r' && self.peek()? != Some('\n') {
                    return Err(ParseError::InvalidStringChar(quote, FmtChar(c), pos).into());
                }

                // eat whitespace
                let mut has_newline = c == '\n';
                loop {
                    match self.peek()? {
                        Some(' ' | '\t') => (),
                        Some('\n') => has_newline = true,
                        Some('\r') if self.peek2()? == Some('\n') => (),
                        _ => break,
                    }
                    self.next()?;
                }

                if !has_newline {
                    let span = Span::new(esc_start, self.pos);
                    return Err(ParseError::InvalidLineEndingEscape(span).into());
                }
            }
            _ => return Err(ParseError::InvalidEscapeChar(FmtChar(c), pos).into()),
        }

        Ok(())
    }

    fn string_escape_unicode(
        &mut self,
        text: &mut String,
        esc_start: Pos,
        num_chars: u32,
    ) -> Result<(), Error> {
        let mut unicode_cp: u32 = 0;
        for _ in 0..num_chars {
            let pos = self.pos;
            let digit = match self.peek()? {
                Some(c @ '0'..='9') => c as u32 - '0' as u32,
                Some(c @ 'a'..='f') => c as u32 - 'a' as u32 + 10,
                Some(c @ 'A'..='F') => c as u32 - 'A' as u32 + 10,
                None | Some('"' | '\n' | '\r') => {
                    let span = Span::new(esc_start, pos);
                    return Err(ParseError::UnfinishedEscapeSequence(span).into());
                }
                Some(c) => {
                    return Err(ParseError::InvalidUnicodeEscapeChar(FmtChar(c), pos).into());
                }
            };
            self.next()?;
            unicode_cp = (unicode_cp << 4) | digit;
        }

        match char::from_u32(unicode_cp) {
            Some(c) => {
                text.push(c);
                Ok(())
            }
            None => {
                let span = Span::new(esc_start, self.pos);
                Err(ParseError::InvalidUnicodeCodepoint(unicode_cp, span).into())
            }
        }
    }
}

#[inline(always)]
fn advance(pos: Pos, c: char) -> Pos {
    match c {
        '\n' => pos.next_line(),
        _ => pos.after(c),
    }
}
