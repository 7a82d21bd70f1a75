use unicode_width::UnicodeWidthStr;

use crate::Span;

/// Splits the input into lines, stripping the `\r` of `\r\n` line endings.
pub fn lines(input: &str) -> Vec<&str> {
    let mut lines = input.split('\n').collect::<Vec<_>>();
    if let [terminated_lines @ .., _] = lines.as_mut_slice() {
        for l in terminated_lines {
            if l.ends_with('\r') {
                *l = &l[..l.len() - 1];
            }
        }
    }
    lines
}

pub trait Diagnostic {
    type Hint: DiagnosticHint;

    /// The span of text that is highlighted by this diagnostic.
    fn span(&self) -> Span;

    /// A complete error description.
    fn description(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result;

    /// A shorter description shown inline next to the spanned text.
    ///
    /// This should not contain names that are spanned to reduce clutter.
    fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result;

    /// A supporting hint pointing at another relevant location.
    fn hint(&self) -> Option<Self::Hint> {
        None
    }
}

pub trait DiagnosticHint {
    fn span(&self) -> Span;

    fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result;
}

/// A hint type for diagnostics that never provide one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoHint {}

impl DiagnosticHint for NoHint {
    fn span(&self) -> Span {
        match *self {}
    }

    fn annotation(&self, _: &mut impl std::fmt::Write) -> std::fmt::Result {
        match *self {}
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Hint,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Hint => f.write_str("hint"),
        }
    }
}

/// Whether rendered diagnostics contain ANSI escape sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Style {
    #[default]
    Plain,
    Colored,
}

impl Style {
    fn paint(self, code: &'static str) -> &'static str {
        match self {
            Style::Plain => "",
            Style::Colored => code,
        }
    }

    fn clear(self) -> &'static str {
        self.paint(ANSII_CLEAR)
    }

    fn severity(self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => self.paint(ANSII_COLOR_RED),
            Severity::Hint => self.paint(ANSII_COLOR_BLUE),
        }
    }

    fn gutter(self) -> &'static str {
        self.paint(ANSII_COLOR_BLUE)
    }
}

/// Renders a diagnostic and its hint, ordered by position in the source.
///
/// ```text
/// error: Duplicate key `a`
///     --> 2:1
///      |
///    1 | a = 1
///      | - Original key defined here
///    2 | a = 2
///      | ^ Duplicate key
/// ```
pub fn display(
    f: &mut impl std::fmt::Write,
    diagnostic: &impl Diagnostic,
    lines: &[&str],
    style: Style,
) -> std::fmt::Result {
    display_header(f, diagnostic, lines, style)?;
    writeln!(f, "     {}|{}", style.gutter(), style.clear())?;

    let main_span = diagnostic.span();
    let hint = diagnostic.hint();
    let hint_first = hint.as_ref().is_some_and(|h| h.span().start < main_span.start);

    if let (true, Some(hint)) = (hint_first, &hint) {
        display_body(f, |f| hint.annotation(f), Severity::Hint, hint.span(), lines, style)?;
    }
    display_body(
        f,
        |f| diagnostic.annotation(f),
        Severity::Error,
        main_span,
        lines,
        style,
    )?;
    if let (false, Some(hint)) = (hint_first, &hint) {
        display_body(f, |f| hint.annotation(f), Severity::Hint, hint.span(), lines, style)?;
    }

    Ok(())
}

fn display_header(
    f: &mut impl std::fmt::Write,
    diagnostic: &impl Diagnostic,
    lines: &[&str],
    style: Style,
) -> std::fmt::Result {
    let color = style.severity(Severity::Error);
    let clear = style.clear();
    write!(f, "{color}{}{clear}: ", Severity::Error)?;
    diagnostic.description(f)?;
    f.write_char('\n')?;

    let pos = diagnostic.span().start;
    let line = lines.get(pos.line as usize).copied().unwrap_or("");
    let col = clamp_prefix(line, pos.char as usize).chars().count() + 1;
    writeln!(f, "    {}-->{clear} {}:{col}", style.gutter(), pos.line_nr())
}

fn display_body<F: std::fmt::Write>(
    f: &mut F,
    annotation: impl Fn(&mut F) -> std::fmt::Result,
    severity: Severity,
    span: Span,
    lines: &[&str],
    style: Style,
) -> std::fmt::Result {
    let start_line = span.start.line as usize;
    let end_line = span.end.line.max(span.start.line) as usize;
    let color = style.severity(severity);
    let clear = style.clear();
    let underline_char = match severity {
        Severity::Error => '^',
        Severity::Hint => '-',
    };

    for line_nr in start_line..=end_line {
        let line = lines.get(line_nr).copied().unwrap_or("");
        display_line(f, line_nr, line, style)?;

        let col_start = if line_nr == start_line {
            span.start.char as usize
        } else {
            0
        };
        let col_end = if line_nr == end_line {
            span.end.char as usize
        } else {
            line.len()
        };
        let prefix = clamp_prefix(line, col_start);
        let spanned = &clamp_prefix(line, col_end.max(col_start))[prefix.len()..];

        let num_spaces = calc_width(prefix);
        write!(f, "     {}|{clear} ", style.gutter())?;
        write!(f, "{:num_spaces$}{color}", "")?;
        for _ in 0..calc_width(spanned).max(1) {
            f.write_char(underline_char)?;
        }
        if line_nr == end_line {
            f.write_char(' ')?;
            annotation(f)?;
        }
        writeln!(f, "{clear}")?;
    }

    Ok(())
}

/// `line_nr` is 0-based
pub fn display_line(
    f: &mut impl std::fmt::Write,
    line_nr: usize,
    line: &str,
    style: Style,
) -> std::fmt::Result {
    let line_nr = line_nr + 1;
    write!(f, "{}{line_nr:4} |{} ", style.gutter(), style.clear())?;
    for c in line.chars() {
        match c {
            '\t' => f.write_char(c)?,
            '\x00'..='\x1f' | '\x7f' => (),
            _ => f.write_char(c)?,
        }
    }
    f.write_char('\n')
}

/// Display width of a line, ignoring control characters.
pub fn calc_width(line: &str) -> usize {
    line.split(|c: char| c != '\t' && c.is_ascii_control())
        .map(UnicodeWidthStr::width)
        .sum()
}

/// The longest prefix of `line` that is at most `byte_len` bytes long and ends on a char
/// boundary.
fn clamp_prefix(line: &str, byte_len: usize) -> &str {
    let mut end = byte_len.min(line.len());
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

pub const ANSII_CLEAR: &str = "\x1b[0m";
pub const ANSII_COLOR_RED: &str = "\x1b[91m";
pub const ANSII_COLOR_BLUE: &str = "\x1b[94m";

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Pos;

    struct Dup {
        span: Span,
        orig: Span,
    }

    struct Orig(Span);

    impl DiagnosticHint for Orig {
        fn span(&self) -> Span {
            self.0
        }

        fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
            f.write_str("Original key defined here")
        }
    }

    impl Diagnostic for Dup {
        type Hint = Orig;

        fn span(&self) -> Span {
            self.span
        }

        fn description(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
            f.write_str("Duplicate key `a`")
        }

        fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
            f.write_str("Duplicate key")
        }

        fn hint(&self) -> Option<Orig> {
            Some(Orig(self.orig))
        }
    }

    #[test]
    fn lines_strip_crlf() {
        assert_eq!(lines("a\r\nb\nc\r"), ["a", "b", "c\r"]);
    }

    #[test]
    fn width_ignores_control_chars() {
        assert_eq!(calc_width("ab\u{1}c"), 3);
        assert_eq!(calc_width("äö"), 2);
    }

    #[test]
    fn display_plain_with_hint() {
        let input = "a = 1\na = 2";
        let diagnostic = Dup {
            span: Span::ascii_char(Pos::new(1, 0)),
            orig: Span::ascii_char(Pos::new(0, 0)),
        };
        let mut out = String::new();
        display(&mut out, &diagnostic, &lines(input), Style::Plain).unwrap();
        let expected = "\
error: Duplicate key `a`
    --> 2:1
     |
   1 | a = 1
     | - Original key defined here
   2 | a = 2
     | ^ Duplicate key
";
        assert_eq!(expected, out);
    }

    #[test]
    fn display_span_past_end_of_line() {
        struct Eol;
        impl Diagnostic for Eol {
            type Hint = NoHint;

            fn span(&self) -> Span {
                Span::ascii_char(Pos::new(0, 3))
            }

            fn description(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
                f.write_str("Missing value")
            }

            fn annotation(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
                f.write_str("Missing value")
            }
        }

        let mut out = String::new();
        display(&mut out, &Eol, &lines("a ="), Style::Plain).unwrap();
        assert!(out.ends_with("   1 | a =\n     |    ^ Missing value\n"), "{out}");
    }
}
