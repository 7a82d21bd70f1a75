use common::{FmtStr, Pos, Span};

use crate::datetime::Date;
use crate::error::{Error, ParseError};
use crate::lex::{Lexer, Token, TokenType};
use crate::map::MapBuilder;
use crate::reader::{ReadTimeout, Source};
use crate::value::{Document, Node, NodeKind};

pub use lit::{LitPart, PartialValue};
pub use num::{IntPrefix, Sign};

mod datetime;
mod lit;
mod num;

/// Maximum number of arrays and inline tables enclosing a value.
pub const MAX_NESTING_DEPTH: u32 = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Upper bound for every single blocking read, only used when parsing from a reader.
    pub timeout: ReadTimeout,
    /// Reject arrays whose elements are of different kinds.
    pub strict_array_types: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: ReadTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strict_array_types(mut self, strict: bool) -> Self {
        self.strict_array_types = strict;
        self
    }
}

/// A top-level item of a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    /// `[a.b]`
    Table(Key),
    /// `[[a.b]]`
    ArrayEntry(Key),
    /// `a.b = value`
    Assignment(Assignment),
}

/// A possibly dotted key, never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    pub idents: Vec<Ident>,
}

impl Key {
    pub fn span(&self) -> Span {
        match (self.idents.first(), self.idents.last()) {
            (Some(first), Some(last)) => Span::across(first.span, last.span),
            _ => Span::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub key: Key,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Node, Span),
    InlineTable(InlineTable),
    InlineArray(InlineArray),
}

impl Value {
    pub fn kind(&self) -> NodeKind {
        match self {
            Value::Scalar(n, _) => n.kind(),
            Value::InlineTable(_) => NodeKind::Table,
            Value::InlineArray(_) => NodeKind::Array,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Value::Scalar(_, span) => *span,
            Value::InlineTable(t) => t.span,
            Value::InlineArray(a) => a.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineTable {
    pub assignments: Vec<Assignment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineArray {
    pub values: Vec<Value>,
    pub span: Span,
}

/// Parses a whole document, stopping at the first error.
pub fn parse<S: Source>(lexer: Lexer<S>, options: &ParseOptions) -> Result<Document, Error> {
    let mut parser = Parser::new(lexer, options);
    let mut builder = MapBuilder::new();
    let mut items = 0;
    while let Some(ast) = parser.next_ast()? {
        builder.insert(ast)?;
        items += 1;
    }
    tracing::debug!(items, "parsed document");
    Ok(builder.finish())
}

/// Recursive descent over the tokens of a [`Lexer`], producing one [`Ast`] at a time.
#[derive(Debug)]
pub struct Parser<S> {
    lexer: Lexer<S>,
    peeked: Option<Token>,
    strict_array_types: bool,
    /// Number of currently open arrays and inline tables.
    depth: u32,
}

impl<S: Source> Parser<S> {
    pub fn new(lexer: Lexer<S>, options: &ParseOptions) -> Self {
        Self {
            lexer,
            peeked: None,
            strict_array_types: options.strict_array_types,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Result<&Token, Error> {
        let token = match self.peeked.take() {
            Some(t) => t,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn next(&mut self) -> Result<Token, Error> {
        match self.peeked.take() {
            Some(t) => Ok(t),
            None => self.lexer.next_token(),
        }
    }

    fn peek_ty(&mut self) -> Result<&TokenType, Error> {
        self.peek().map(|t| &t.ty)
    }

    fn skip_newlines_and_comments(&mut self) -> Result<(), Error> {
        while let TokenType::Newline | TokenType::Comment(_) = self.peek_ty()? {
            self.next()?;
        }
        Ok(())
    }

    /// Returns the next header or assignment, or `None` at the end of the input.
    pub fn next_ast(&mut self) -> Result<Option<Ast>, Error> {
        self.skip_newlines_and_comments()?;

        let ast = match self.peek_ty()? {
            TokenType::EOF => return Ok(None),
            TokenType::SquareLeft => self.parse_header()?,
            TokenType::String(_) | TokenType::LiteralOrIdent(_) => {
                Ast::Assignment(self.parse_assignment()?)
            }
            _ => {
                let token = self.next()?;
                let (fmt, span) = token_fmt_str_and_span(&token);
                return Err(ParseError::ExpectedKeyFound(fmt, span).into());
            }
        };

        self.expect_line_end()?;
        Ok(Some(ast))
    }

    fn expect_line_end(&mut self) -> Result<(), Error> {
        if let TokenType::Comment(_) = self.peek_ty()? {
            self.next()?;
        }

        match self.peek_ty()? {
            TokenType::Newline | TokenType::EOF => Ok(()),
            _ => {
                let token = self.next()?;
                let (fmt, span) = token_fmt_str_and_span(&token);
                Err(ParseError::ExpectedNewlineFound(fmt, span).into())
            }
        }
    }

    fn parse_header(&mut self) -> Result<Ast, Error> {
        let l_par = self.next()?;

        let next = self.peek()?;
        let is_array = next.ty == TokenType::SquareLeft;
        if is_array {
            if !Span::adjacent(l_par.span, next.span) {
                let span = Span::between(l_par.span, next.span);
                return Err(ParseError::SpaceBetweenArrayPars(span).into());
            }
            self.next()?;
        }

        let key = self.parse_key()?;

        let r_par = self.expect_right_square(l_par.span.start)?;
        if is_array {
            let second = self.expect_right_square(l_par.span.start)?;
            if !Span::adjacent(r_par.span, second.span) {
                let span = Span::between(r_par.span, second.span);
                return Err(ParseError::SpaceBetweenArrayPars(span).into());
            }
            Ok(Ast::ArrayEntry(key))
        } else {
            Ok(Ast::Table(key))
        }
    }

    fn expect_right_square(&mut self, l_par: Pos) -> Result<Token, Error> {
        let token = self.next()?;
        match token.ty {
            TokenType::SquareRight => Ok(token),
            _ => {
                let (fmt, span) = token_fmt_str_and_span(&token);
                Err(ParseError::ExpectedRightSquareFound(fmt, l_par, span).into())
            }
        }
    }

    fn parse_assignment(&mut self) -> Result<Assignment, Error> {
        let key = self.parse_key()?;

        let token = self.next()?;
        if token.ty != TokenType::Equal {
            let (fmt, span) = token_fmt_str_and_span(&token);
            return Err(ParseError::ExpectedEqOrDotFound(fmt, span).into());
        }

        let value = self.parse_value()?;
        Ok(Assignment { key, value })
    }

    fn parse_key(&mut self) -> Result<Key, Error> {
        let mut idents = vec![self.parse_ident()?];
        while let TokenType::Dot = self.peek_ty()? {
            self.next()?;
            idents.push(self.parse_ident()?);
        }
        Ok(Key { idents })
    }

    fn parse_ident(&mut self) -> Result<Ident, Error> {
        let token = self.next()?;
        match token.ty {
            TokenType::String(s) => {
                if s.quote.is_multiline() {
                    return Err(ParseError::MultilineStringKey(s.quote, token.span).into());
                }
                Ok(Ident {
                    text: s.text,
                    span: token.span,
                })
            }
            TokenType::LiteralOrIdent(lit) => {
                let invalid = lit
                    .char_indices()
                    .find(|(_, c)| !matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-'));
                if let Some((i, c)) = invalid {
                    let pos = token.span.start.plus(i as u32);
                    return Err(ParseError::InvalidCharInIdentifier(c.into(), pos).into());
                }
                Ok(Ident {
                    text: lit,
                    span: token.span,
                })
            }
            _ => {
                let (fmt, span) = token_fmt_str_and_span(&token);
                Err(ParseError::ExpectedKeyFound(fmt, span).into())
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        let token = self.next()?;
        match token.ty {
            TokenType::String(s) => Ok(Value::Scalar(Node::from(s.text), token.span)),
            TokenType::LiteralOrIdent(lit) => self.parse_literal_value(lit, token.span),
            TokenType::SquareLeft | TokenType::CurlyLeft => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep(token.span).into());
                }
                self.depth += 1;
                let value = match token.ty {
                    TokenType::SquareLeft => self.parse_inline_array(token.span.start),
                    _ => self.parse_inline_table(token.span.start),
                };
                self.depth -= 1;
                value
            }
            TokenType::Dot => {
                Err(ParseError::UnexpectedLiteralStart('.'.into(), token.span.start).into())
            }
            _ => {
                let (fmt, span) = token_fmt_str_and_span(&token);
                Err(ParseError::ExpectedValueFound(fmt, span).into())
            }
        }
    }

    fn parse_literal_value(&mut self, lit: String, span: Span) -> Result<Value, Error> {
        let (lit, span) = self.combine_adjacent_dot_and_lit(lit, span)?;
        match lit::parse_literal(&lit, span)? {
            PartialValue::PartialDate(date) => self.try_to_parse_time_part(date, span),
            val => Ok(Value::Scalar(val.into_node(), span)),
        }
    }

    /// Dots always split literals, so floats and date-times with fractional seconds arrive in
    /// parts. Joins all parts directly following each other.
    fn combine_adjacent_dot_and_lit(
        &mut self,
        mut lit: String,
        mut span: Span,
    ) -> Result<(String, Span), Error> {
        loop {
            let t = self.peek()?;
            if t.span.start != span.end {
                return Ok((lit, span));
            }

            match &t.ty {
                TokenType::Dot => lit.push('.'),
                TokenType::LiteralOrIdent(next) => lit.push_str(next),
                _ => return Ok((lit, span)),
            }
            span.end = t.span.end;
            self.next()?;
        }
    }

    /// A date may be followed by a time separated by a single space.
    fn try_to_parse_time_part(
        &mut self,
        date: Date,
        date_span: Span,
    ) -> Result<Value, Error> {
        let is_time = matches!(
            self.peek_ty()?,
            TokenType::LiteralOrIdent(lit) if lit.starts_with(|c: char| c.is_ascii_digit())
        );
        if !is_time {
            return Ok(Value::Scalar(Node::from(date), date_span));
        }
        // the time token was lexed last, so the lexer still knows what preceded it
        let tab_separated = self.lexer.skipped_tab();

        let token = self.next()?;
        let TokenType::LiteralOrIdent(time_lit) = token.ty else {
            return Err(Error::Internal("peeked token changed".into()));
        };
        let (time_lit, time_span) = self.combine_adjacent_dot_and_lit(time_lit, token.span)?;

        // only need to compare columns, there is no newline token in between
        if tab_separated || time_span.start.char > date_span.end.char + 1 {
            let span = Span::between(date_span, time_span);
            return Err(ParseError::DateAndTimeTooFarApart(span).into());
        }

        let mut chars = time_lit.char_indices().peekable();
        let (time, offset) = datetime::parse_time_and_offset(&mut chars, time_span)?;
        let val = PartialValue::from_optional_offset(date, time, offset);
        Ok(Value::Scalar(val.into_node(), Span::across(date_span, time_span)))
    }

    fn parse_inline_array(&mut self, l_par: Pos) -> Result<Value, Error> {
        let mut values: Vec<Value> = Vec::new();
        loop {
            self.skip_newlines_and_comments()?;

            match self.peek_ty()? {
                TokenType::SquareRight => {
                    let r_par = self.next()?;
                    let span = Span::new(l_par, r_par.span.end);
                    return Ok(Value::InlineArray(InlineArray { values, span }));
                }
                TokenType::EOF => {
                    let token = self.next()?;
                    let (fmt, span) = token_fmt_str_and_span(&token);
                    return Err(ParseError::ExpectedRightSquareFound(fmt, l_par, span).into());
                }
                _ => (),
            }

            let value = self.parse_value()?;
            if let Some(first) = values.first().filter(|_| self.strict_array_types) {
                if first.kind() != value.kind() {
                    return Err(ParseError::MixedArrayTypes {
                        expected: first.kind(),
                        found: value.kind(),
                        first: first.span(),
                        span: value.span(),
                    }
                    .into());
                }
            }
            let value_end = value.span().end;
            values.push(value);

            self.skip_newlines_and_comments()?;
            let token = self.next()?;
            match token.ty {
                TokenType::Comma => (),
                TokenType::SquareRight => {
                    let span = Span::new(l_par, token.span.end);
                    return Ok(Value::InlineArray(InlineArray { values, span }));
                }
                TokenType::String(_)
                | TokenType::LiteralOrIdent(_)
                | TokenType::SquareLeft
                | TokenType::CurlyLeft => {
                    return Err(ParseError::MissingComma(value_end).into());
                }
                _ => {
                    let (fmt, span) = token_fmt_str_and_span(&token);
                    return Err(ParseError::ExpectedRightSquareFound(fmt, l_par, span).into());
                }
            }
        }
    }

    fn parse_inline_table(&mut self, l_par: Pos) -> Result<Value, Error> {
        let mut assignments = Vec::new();
        if let TokenType::CurlyRight = self.peek_ty()? {
            let r_par = self.next()?;
            let span = Span::new(l_par, r_par.span.end);
            return Ok(Value::InlineTable(InlineTable { assignments, span }));
        }

        loop {
            assignments.push(self.parse_assignment()?);

            let token = self.next()?;
            match token.ty {
                TokenType::Comma => {
                    if let TokenType::CurlyRight = self.peek_ty()? {
                        return Err(ParseError::InlineTableTrailingComma(token.span.start).into());
                    }
                }
                TokenType::CurlyRight => {
                    let span = Span::new(l_par, token.span.end);
                    return Ok(Value::InlineTable(InlineTable { assignments, span }));
                }
                _ => {
                    let (fmt, span) = token_fmt_str_and_span(&token);
                    return Err(ParseError::ExpectedRightCurlyFound(fmt, l_par, span).into());
                }
            }
        }
    }
}

fn token_fmt_str_and_span(token: &Token) -> (FmtStr, Span) {
    (token_fmt_str(&token.ty), token_span(token))
}

fn token_fmt_str(ty: &TokenType) -> FmtStr {
    match ty {
        TokenType::String(s) => {
            let text = FmtStr::from(s.text.as_str());
            FmtStr::from_string(format!("`{}{text}{}`", s.quote, s.quote))
        }
        TokenType::LiteralOrIdent(lit) => {
            FmtStr::from_string(format!("`{}`", FmtStr::from(lit.as_str())))
        }
        TokenType::Comment(_) => FmtStr::from("comment"),
        TokenType::SquareLeft => FmtStr::from("`[`"),
        TokenType::SquareRight => FmtStr::from("`]`"),
        TokenType::CurlyLeft => FmtStr::from("`{`"),
        TokenType::CurlyRight => FmtStr::from("`}`"),
        TokenType::Equal => FmtStr::from("`=`"),
        TokenType::Comma => FmtStr::from("`,`"),
        TokenType::Dot => FmtStr::from("`.`"),
        TokenType::Newline => FmtStr::from("`\\n`"),
        TokenType::EOF => FmtStr::from("`EOF`"),
    }
}

/// Line breaks are reported as a position, not as a range spanning into the next line.
fn token_span(token: &Token) -> Span {
    match token.ty {
        TokenType::Newline | TokenType::EOF => Span::pos(token.span.start),
        _ => token.span,
    }
}
