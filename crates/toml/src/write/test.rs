use pretty_assertions::assert_eq;

use super::*;
use crate::test::{parse, table};

#[track_caller]
fn check_json(input: &str, expected: &str) {
    let doc = parse(input).unwrap();
    assert_eq!(to_json_string(&doc), expected);
}

#[track_caller]
fn check_round_trip(input: &str) {
    let doc = parse(input).unwrap();
    let written = to_toml_string(&doc);
    match parse(&written) {
        Ok(reparsed) => {
            assert_eq!(doc, reparsed, "\nwritten:\n{written}");
            assert_eq!(
                doc.keys().collect::<Vec<_>>(),
                reparsed.keys().collect::<Vec<_>>()
            );
        }
        Err(e) => panic!("\nwritten:\n{written}\nerror: {e}"),
    }
}

#[test]
fn json_empty_document() {
    check_json("", "{}");
    check_json("# nothing\n\n", "{}");
}

#[test]
fn json_scalars() {
    check_json(
        "s = 'a\"b'\ni = 42\nf = 1.5\nb = true\nld = 1979-05-27\nlt = 07:32:00\nldt = 1979-05-27T07:32:00\nodt = 1979-05-27T07:32:00Z\n",
        concat!(
            r#"{"s": {"type":"string","value":"a\"b"}, "#,
            r#""i": {"type":"integer","value":"42"}, "#,
            r#""f": {"type":"float","value":"1.5"}, "#,
            r#""b": {"type":"bool","value":"true"}, "#,
            r#""ld": {"type":"local_date","value":"1979-05-27"}, "#,
            r#""lt": {"type":"local_time","value":"07:32:00"}, "#,
            r#""ldt": {"type":"local_datetime","value":"1979-05-27T07:32:00"}, "#,
            r#""odt": {"type":"datetime","value":"1979-05-27T07:32:00Z"}}"#,
        ),
    );
}

#[test]
fn json_floats() {
    check_json(
        "a = inf\nb = -inf\nc = nan\nd = 1e6\ne = -0.0\nf = 0.1\n",
        concat!(
            r#"{"a": {"type":"float","value":"inf"}, "#,
            r#""b": {"type":"float","value":"-inf"}, "#,
            r#""c": {"type":"float","value":"nan"}, "#,
            r#""d": {"type":"float","value":"1000000.0"}, "#,
            r#""e": {"type":"float","value":"-0.0"}, "#,
            r#""f": {"type":"float","value":"0.1"}}"#,
        ),
    );
}

#[test]
fn json_date_time_fractions_and_offsets() {
    check_json(
        "a = 1979-05-27T00:32:00.999999-07:00\nb = 07:32:00.500\n",
        concat!(
            r#"{"a": {"type":"datetime","value":"1979-05-27T00:32:00.999999-07:00"}, "#,
            r#""b": {"type":"local_time","value":"07:32:00.5"}}"#,
        ),
    );
}

#[test]
fn json_escapes_strings_and_keys() {
    check_json(
        "\"k\\\"ey\" = \"tab\\there\\nline \\u0001\"\n",
        r#"{"k\"ey": {"type":"string","value":"tab\there\nline \u0001"}}"#,
    );
}

#[test]
fn json_arrays_and_tables() {
    check_json(
        "a = [1, [2]]\n[[t]]\nx = 1\n[[t]]\n[u.v]\n",
        concat!(
            r#"{"a": {"type":"array","value":[{"type":"integer","value":"1"}, "#,
            r#"{"type":"array","value":[{"type":"integer","value":"2"}]}]}, "#,
            r#""t": [{"x": {"type":"integer","value":"1"}}, {}], "#,
            r#""u": {"v": {}}}"#,
        ),
    );
}

#[test]
fn toml_sections() {
    let doc = parse(
        "title = 'x'\n[owner]\nname = 'ada'\ntags = ['a', 'b']\n[owner.address]\ncity = 'x'\n[[products]]\nid = 1\n[[products]]\nid = 2\nmeta = { a = 1, b = [] }\n",
    )
    .unwrap();
    assert_eq!(
        to_toml_string(&doc),
        "\
title = \"x\"

[owner]
name = \"ada\"
tags = [\"a\", \"b\"]

[owner.address]
city = \"x\"

[[products]]
id = 1

[[products]]
id = 2

[products.meta]
a = 1
b = []
"
    );
}

#[test]
fn toml_values_are_written_before_sections() {
    let doc = crate::Document::new(table([
        ("a", crate::Node::Table(table([]))),
        ("d", crate::Node::from(2)),
    ]));
    assert_eq!(to_toml_string(&doc), "d = 2\n\n[a]\n");
}

#[test]
fn toml_round_trip() {
    check_round_trip(
        "\
'quoted key' = \"line\\nbreak \\\"quotes\\\" \\\\ \\u0007\"
\"\" = 'empty key'
int = -9223372036854775808
floats = [inf, -inf, 1e-7, 5e22, -0.0, 3.5]
dates = [1979-05-27, 07:32:00.25, 1979-05-27T07:32:00, 1979-05-27T07:32:00+05:30]
mixed = [{ a = 1 }, [{}], 'str']

[a.'b.c'.d]
e = { f.g = true }

[[a.list]]
x = 1

[[a.list]]

[[a.list]]
y.z = [1, 2]
[a.list.sub]
w = 'w'
",
    );
}

#[test]
fn toml_empty_document() {
    let doc = parse("").unwrap();
    assert_eq!(to_toml_string(&doc), "");
}
