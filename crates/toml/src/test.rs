pub use pretty_assertions::assert_eq;

pub use crate::datetime::{Date, LocalDateTime, Offset, OffsetDateTime, Time};
pub use crate::error::{Error, ParseError};
pub use crate::parse::ParseOptions;
pub use crate::value::{Array, Document, Node, Table, TableArray};
pub use common::{FmtChar, FmtStr, Pos, Span};

pub fn parse(input: &str) -> Result<Document, Error> {
    crate::from_str(input)
}

pub fn parse_strict(input: &str) -> Result<Document, Error> {
    crate::from_str_with(input, &ParseOptions::new().with_strict_array_types(true))
}

#[track_caller]
pub fn check(input: &str, expected: Table) {
    match parse(input) {
        Ok(doc) => {
            assert_eq!(&expected, doc.root());
            // `Table` equality ignores the order, so compare that separately
            assert_eq!(
                expected.keys().collect::<Vec<_>>(),
                doc.keys().collect::<Vec<_>>()
            );
        }
        Err(e) => panic!("\nerrors: {e:#?}\ninput: {input:?}"),
    }
}

#[track_caller]
pub fn check_error(input: &str, expected: ParseError) {
    match parse(input) {
        Ok(doc) => panic!("\nexpected error: {expected:#?}\nparsed: {doc:#?}"),
        Err(Error::Parse(e)) => assert_eq!(expected, e),
        Err(e) => panic!("\nexpected parse error: {expected:#?}\nfound: {e:#?}"),
    }
}

pub fn table<const N: usize>(entries: [(&str, Node); N]) -> Table {
    entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

pub fn array<const N: usize>(values: [Node; N]) -> Node {
    Node::Array(Array::new(values.into()))
}

pub fn table_array<const N: usize>(tables: [Table; N]) -> Node {
    Node::TableArray(TableArray::new(tables.into()))
}

pub fn span(line: u32, start: u32, end: u32) -> Span {
    Span::new(Pos::new(line, start), Pos::new(line, end))
}

pub fn fmt_str(s: &str) -> FmtStr {
    FmtStr::from(s)
}

#[test]
fn document_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Document>();
    assert_send_sync::<Error>();
}

#[test]
fn end_to_end() {
    let doc = parse("title = \"demo\"\n[owner]\nname = \"ada\"\n").unwrap();
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["title", "owner"]);
    assert_eq!(doc["title"], Node::from("demo"));
    assert_eq!(
        doc["owner"],
        Node::Table(table([("name", Node::from("ada"))]))
    );

    let json = crate::write::to_json_string(&doc);
    assert_eq!(
        json,
        r#"{"title": {"type":"string","value":"demo"}, "owner": {"name": {"type":"string","value":"ada"}}}"#
    );
}

#[test]
fn reader_and_str_agree() {
    let input = "a = 1\nb.c = [1.5, 'x', 1979-05-27]\n[[d]]\ne = true\n[[d]]\n";
    let from_str = parse(input).unwrap();
    let from_reader = crate::from_reader(input.as_bytes(), ParseOptions::default()).unwrap();
    assert_eq!(from_str, from_reader);
}

#[test]
fn errors_report_position() {
    let err = parse("a = 1\nb = 1__0\n").unwrap_err();
    let Error::Parse(err) = err else {
        panic!("{err:?}");
    };
    assert_eq!(err.kind(), crate::ParseErrorKind::Lexical);
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 6);
    assert_eq!(
        err.to_string(),
        "Consecutive underscores (`_`) are not allowed in the integer or float at line 2, column 6"
    );
}
