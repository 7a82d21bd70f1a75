use common::{FmtChar, Pos, Span};
use pretty_assertions::assert_eq;

use super::*;

fn types(input: &str) -> Vec<TokenType> {
    lex(input).unwrap().into_iter().map(|t| t.ty).collect()
}

fn lit(s: &str) -> TokenType {
    TokenType::LiteralOrIdent(s.into())
}

fn string(quote: Quote, text: &str) -> TokenType {
    TokenType::String(StringToken {
        quote,
        text: text.into(),
    })
}

/// Lexes a single string token.
#[track_caller]
fn check_str(input: &str, quote: Quote, text: &str) {
    let tokens = lex(input).unwrap();
    assert_eq!(tokens.len(), 2, "{tokens:#?}");
    assert_eq!(tokens[0].ty, string(quote, text));
}

#[track_caller]
fn check_error(input: &str, expected: ParseError) {
    match lex(input) {
        Err(Error::Parse(e)) => assert_eq!(expected, e),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn assignment() {
    let tokens = lex("abc = 12").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token {
                ty: lit("abc"),
                span: Span::new(Pos::new(0, 0), Pos::new(0, 3)),
            },
            Token {
                ty: TokenType::Equal,
                span: Span::ascii_char(Pos::new(0, 4)),
            },
            Token {
                ty: lit("12"),
                span: Span::new(Pos::new(0, 6), Pos::new(0, 8)),
            },
            Token {
                ty: TokenType::EOF,
                span: Span::pos(Pos::new(0, 8)),
            },
        ]
    );
}

#[test]
fn punctuation() {
    assert_eq!(
        types("[[a.b]]\n{x=[1,2]}"),
        vec![
            TokenType::SquareLeft,
            TokenType::SquareLeft,
            lit("a"),
            TokenType::Dot,
            lit("b"),
            TokenType::SquareRight,
            TokenType::SquareRight,
            TokenType::Newline,
            TokenType::CurlyLeft,
            lit("x"),
            TokenType::Equal,
            TokenType::SquareLeft,
            lit("1"),
            TokenType::Comma,
            lit("2"),
            TokenType::SquareRight,
            TokenType::CurlyRight,
            TokenType::EOF,
        ]
    );
}

#[test]
fn dots_split_literals() {
    assert_eq!(
        types("3.14e+2"),
        vec![lit("3"), TokenType::Dot, lit("14e+2"), TokenType::EOF]
    );
}

#[test]
fn crlf_positions() {
    let tokens = lex("a\r\n\r\nb # hi\r\n").unwrap();
    let spans = tokens.iter().map(|t| t.span).collect::<Vec<_>>();
    assert_eq!(
        spans,
        vec![
            Span::new(Pos::new(0, 0), Pos::new(0, 1)),
            Span::new(Pos::new(0, 1), Pos::new(0, 3)),
            Span::new(Pos::new(1, 0), Pos::new(1, 2)),
            Span::new(Pos::new(2, 0), Pos::new(2, 1)),
            Span::new(Pos::new(2, 2), Pos::new(2, 6)),
            Span::new(Pos::new(2, 6), Pos::new(2, 8)),
            Span::pos(Pos::new(3, 0)),
        ]
    );
    assert_eq!(tokens[4].ty, TokenType::Comment(" hi".into()));
}

#[test]
fn lone_carriage_return() {
    check_error("a = 1\rb = 2", ParseError::LoneCarriageReturn(Pos::new(0, 5)));
}

#[test]
fn comment_control_char() {
    check_error(
        "# abc\u{1}",
        ParseError::InvalidCommentChar(FmtChar('\u{1}'), Pos::new(0, 5)),
    );
}

#[test]
fn basic_strings() {
    check_str(r#""""#, Quote::Basic, "");
    check_str(r#""abc""#, Quote::Basic, "abc");
    check_str(r#""a\tb\n\"\\""#, Quote::Basic, "a\tb\n\"\\");
    check_str(r#""\u00e4\U0001F600""#, Quote::Basic, "ä😀");
    check_str("\"tab\tallowed\"", Quote::Basic, "tab\tallowed");
}

#[test]
fn literal_strings() {
    check_str("''", Quote::Literal, "");
    check_str(r"'C:\Users\nodejs'", Quote::Literal, r"C:\Users\nodejs");
}

#[test]
fn multiline_strings() {
    check_str("\"\"\"\nline 1\nline 2\"\"\"", Quote::BasicMultiline, "line 1\nline 2");
    check_str("\"\"\"\r\nwin\r\ndows\"\"\"", Quote::BasicMultiline, "win\ndows");
    check_str(
        "\"\"\"The quick \\\n\n     brown fox\"\"\"",
        Quote::BasicMultiline,
        "The quick brown fox",
    );
    check_str("'''\n  raw \\n '''", Quote::LiteralMultiline, "  raw \\n ");
}

#[test]
fn multiline_closing_quotes() {
    check_str(r#""""a"""""#, Quote::BasicMultiline, "a\"\"");
    check_str(r#""""a""b""""#, Quote::BasicMultiline, "a\"\"b\"");
    check_str("''''a'''''", Quote::LiteralMultiline, "'a''");
    check_error(
        r#""""a""""""#,
        ParseError::ExcessiveQuotes(
            Quote::BasicMultiline,
            Span::new(Pos::new(0, 9), Pos::new(0, 10)),
        ),
    );
}

#[test]
fn unterminated_strings() {
    check_error(
        "a = \"abc\nb = 1",
        ParseError::MissingQuote(Quote::Basic, Pos::new(0, 4), Pos::new(0, 8)),
    );
    check_error(
        "a = 'abc",
        ParseError::MissingQuote(Quote::Literal, Pos::new(0, 4), Pos::new(0, 8)),
    );
    check_error(
        "a = '''abc\n",
        ParseError::MissingQuote(Quote::LiteralMultiline, Pos::new(0, 4), Pos::new(1, 0)),
    );
}

#[test]
fn string_control_char() {
    check_error(
        "\"a\u{7f}\"",
        ParseError::InvalidStringChar(Quote::Basic, FmtChar('\u{7f}'), Pos::new(0, 2)),
    );
}

#[test]
fn invalid_escapes() {
    check_error(
        r#""\x41""#,
        ParseError::InvalidEscapeChar(FmtChar('x'), Pos::new(0, 2)),
    );
    check_error(
        r#""\u00g0""#,
        ParseError::InvalidUnicodeEscapeChar(FmtChar('g'), Pos::new(0, 5)),
    );
    check_error(
        r#""\u00""#,
        ParseError::UnfinishedEscapeSequence(Span::new(Pos::new(0, 1), Pos::new(0, 5))),
    );
    check_error(
        r#""\uD800""#,
        ParseError::InvalidUnicodeCodepoint(0xd800, Span::new(Pos::new(0, 1), Pos::new(0, 7))),
    );
    check_error(
        "\"\"\"a \\  b\"\"\"",
        ParseError::InvalidLineEndingEscape(Span::new(Pos::new(0, 5), Pos::new(0, 8))),
    );
}

#[test]
fn invalid_utf8() {
    let mut lexer = Lexer::new(SliceSource::new(b"a = \"\xff\""));
    assert_eq!(lexer.next_token().unwrap().ty, lit("a"));
    assert_eq!(lexer.next_token().unwrap().ty, TokenType::Equal);
    match lexer.next_token() {
        Err(Error::Parse(e)) => assert_eq!(e, ParseError::InvalidUtf8(Pos::new(0, 5))),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn multibyte_positions() {
    let tokens = lex("ä = \"ö\"").unwrap();
    assert_eq!(tokens[0].span, Span::new(Pos::new(0, 0), Pos::new(0, 2)));
    assert_eq!(tokens[1].span, Span::ascii_char(Pos::new(0, 3)));
    assert_eq!(tokens[2].span, Span::new(Pos::new(0, 5), Pos::new(0, 9)));
}

#[test]
fn escape_control_chars() {
    assert_eq!(escape_string("plain"), "plain");
    assert_eq!(escape_string("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    assert_eq!(escape_string("\u{1}\u{7f}\t"), "\\u0001\\u007F\\t");
}

#[test]
fn escape_is_reversible() {
    let original = "quote \" backslash \\ newline \n bell \u{7} done";
    let literal = format!("\"{}\"", escape_string(original));
    check_str(&literal, Quote::Basic, original);
}
