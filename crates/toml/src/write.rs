//! Visitors that render a [`Document`] as text.

use crate::value::Document;
use crate::visit::Accept;

pub mod json;
pub mod toml;
#[cfg(test)]
mod test;

/// Renders the conformance JSON encoding of a document.
pub fn to_json_string(doc: &Document) -> String {
    let mut out = String::new();
    // writing into a `String` can't fail
    _ = doc.accept(&mut json::JsonWriter::new(&mut out));
    out
}

/// Renders a document as TOML, parsing the output yields an equal document.
pub fn to_toml_string(doc: &Document) -> String {
    let mut out = String::new();
    _ = doc.accept(&mut toml::TomlWriter::new(&mut out));
    out
}

/// Shortest representation that parses back to the same value, with TOML's spelling of the
/// special values.
fn fmt_float(f: &mut impl std::fmt::Write, val: f64) -> std::fmt::Result {
    if val.is_nan() {
        f.write_str("nan")
    } else if val.is_infinite() {
        f.write_str(if val > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{val:?}")
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && (key.chars()).all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-'))
}
