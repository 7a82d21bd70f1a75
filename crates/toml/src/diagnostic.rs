use common::diagnostic;

pub use common::diagnostic::Style;

use crate::error::ParseError;

/// Renders a parse error with the offending source lines of `input`.
pub fn render(error: &ParseError, input: &str, style: Style) -> String {
    let lines = diagnostic::lines(input);
    let mut out = String::new();
    // writing into a `String` can't fail
    _ = diagnostic::display(&mut out, error, &lines, style);
    out
}
