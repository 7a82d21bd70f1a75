//! A TOML parser for blocking input streams.
//!
//! Input is pulled byte by byte through a [`Source`]. When parsing from an arbitrary [`Read`]er
//! every single read is bounded by a [`ReadTimeout`], so a stalled stream fails with
//! [`Error::Timeout`] instead of blocking forever, while a slow but steady stream parses fine.
//!
//! ```
//! let doc = streamtoml::from_str("title = \"demo\"\n[owner]\nname = \"ada\"\n").unwrap();
//! assert_eq!(doc.keys().collect::<Vec<_>>(), ["title", "owner"]);
//! assert_eq!(doc["owner"].as_table().unwrap()["name"].as_str(), Some("ada"));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use error::{ConfigError, Error, ParseError, ParseErrorKind, StreamReadTimeout};
pub use lex::{escape_string, Quote};
pub use parse::{ParseOptions, MAX_NESTING_DEPTH};
pub use reader::{ReadTimeout, SliceSource, Source, TimeoutReader};
pub use value::{Array, Document, Node, NodeKind, Scalar, Table, TableArray};
pub use visit::{Accept, Visitor};

pub mod datetime;
pub mod diagnostic;
pub mod error;
pub mod lex;
pub mod map;
pub mod parse;
pub mod reader;
pub mod value;
pub mod visit;
pub mod write;
#[cfg(test)]
mod test;

/// Parses an in-memory document.
pub fn from_str(input: &str) -> Result<Document, Error> {
    from_str_with(input, &ParseOptions::default())
}

/// Parses an in-memory document, the timeout of `options` is unused.
pub fn from_str_with(input: &str, options: &ParseOptions) -> Result<Document, Error> {
    tracing::debug!(source = "str", len = input.len(), "parsing document");
    parse_with(SliceSource::new(input.as_bytes()), options)
}

/// Parses from a blocking reader, failing if any single read takes longer than the configured
/// timeout. The reader is moved onto a helper thread.
pub fn from_reader<R: Read + Send + 'static>(
    reader: R,
    options: ParseOptions,
) -> Result<Document, Error> {
    let timeout = options.timeout;
    tracing::debug!(
        source = "reader",
        timeout_ms = timeout.get().as_millis() as u64,
        "parsing document"
    );
    let reader = TimeoutReader::new(reader, timeout)?;
    parse_with(reader, &options)
}

/// Opens the file and parses it like [`from_reader`].
pub fn from_path(path: impl AsRef<Path>, options: ParseOptions) -> Result<Document, Error> {
    let file = File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "opened file");
    from_reader(file, options)
}

/// Parses a document from any byte source.
pub fn parse_with<S: Source>(source: S, options: &ParseOptions) -> Result<Document, Error> {
    parse::parse(lex::Lexer::new(source), options)
}
