use pretty_assertions::assert_eq;

use super::*;
use crate::lex::Lexer;
use crate::parse::{ParseOptions, Parser};
use crate::reader::SliceSource;
use crate::test::{array, check, check_error, fmt_str, span, table, table_array};

fn build(input: &str) -> MapTable {
    let lexer = Lexer::new(SliceSource::new(input.as_bytes()));
    let mut parser = Parser::new(lexer, &ParseOptions::default());
    let mut builder = MapBuilder::new();
    while let Some(ast) = parser.next_ast().unwrap() {
        builder.insert(ast).unwrap();
    }
    builder.root
}

#[track_caller]
fn table_kind(table: &MapTable, key: &str) -> TableKind {
    match table.get(key).map(|e| &e.node) {
        Some(MapNode::Table(_, kind)) => *kind,
        other => panic!("`{key}` is not a table: {other:#?}"),
    }
}

#[test]
fn table_kinds() {
    let root = build("[x.y.z]\n[x]\na.b = 1\nc = { d = 1 }\n");
    assert_eq!(table_kind(&root, "x"), TableKind::Header);

    let Some(MapNode::Table(x, _)) = root.get("x").map(|e| &e.node) else {
        panic!();
    };
    assert_eq!(table_kind(x, "y"), TableKind::Implicit);
    assert_eq!(table_kind(x, "a"), TableKind::Dotted);
    assert!(matches!(x.get("c").map(|e| &e.node), Some(MapNode::Frozen(_))));
}

#[test]
fn implicit_table_takes_span_of_defining_header() {
    let root = build("[a.b]\n[a]\n");
    assert_eq!(root.get("a").map(|e| e.span), Some(span(1, 1, 2)));
}

#[test]
fn sub_table_defined_before_parent() {
    check(
        "[a.b]\nc = 1\n[a]\nd = 2\ne.f = 3\n",
        table([(
            "a",
            Node::Table(table([
                ("b", Node::Table(table([("c", Node::from(1))]))),
                ("d", Node::from(2)),
                ("e", Node::Table(table([("f", Node::from(3))]))),
            ])),
        )]),
    );
}

#[test]
fn dotted_keys_extend_dotted_tables() {
    check(
        "a.b = 1\na.c = 2\nd = 3\n",
        table([
            (
                "a",
                Node::Table(table([("b", Node::from(1)), ("c", Node::from(2))])),
            ),
            ("d", Node::from(3)),
        ]),
    );
}

#[test]
fn header_traverses_dotted_table() {
    check(
        "[fruit]\napple.color = 'red'\n[fruit.apple.texture]\nsmooth = true\n",
        table([(
            "fruit",
            Node::Table(table([(
                "apple",
                Node::Table(table([
                    ("color", Node::from("red")),
                    (
                        "texture",
                        Node::Table(table([("smooth", Node::from(true))])),
                    ),
                ])),
            )])),
        )]),
    );
}

#[test]
fn array_of_tables() {
    check(
        "[[pts]]\nx = 1\n[[pts]]\nx = 2\n",
        table([(
            "pts",
            table_array([
                table([("x", Node::from(1))]),
                table([("x", Node::from(2))]),
            ]),
        )]),
    );
}

#[test]
fn headers_resolve_to_last_array_element() {
    check(
        "[[a]]\n[a.b]\nc = 1\n[[a]]\n[[a.d]]\ne = 2\n",
        table([(
            "a",
            table_array([
                table([("b", Node::Table(table([("c", Node::from(1))])))]),
                table([("d", table_array([table([("e", Node::from(2))])]))]),
            ]),
        )]),
    );
}

#[test]
fn empty_tables_are_kept() {
    check(
        "[a]\n[[b]]\n[c.d]\n",
        table([
            ("a", Node::Table(table([]))),
            ("b", table_array([table([])])),
            ("c", Node::Table(table([("d", Node::Table(table([])))]))),
        ]),
    );
}

#[test]
fn array_of_inline_tables() {
    check(
        "a = [{ b = 1 }, {}]\n",
        table([(
            "a",
            array([
                Node::Table(table([("b", Node::from(1))])),
                Node::Table(table([])),
            ]),
        )]),
    );
}

#[test]
fn duplicate_key() {
    check_error(
        "a = 1\na = 2",
        ParseError::DuplicateKey {
            path: fmt_str("a"),
            orig: span(0, 0, 1),
            duplicate: span(1, 0, 1),
        },
    );
}

#[test]
fn duplicate_key_in_table() {
    check_error(
        "[t]\n'x y' = 1\n\"x y\" = 2",
        ParseError::DuplicateKey {
            path: fmt_str("t.'x y'"),
            orig: span(1, 0, 5),
            duplicate: span(2, 0, 5),
        },
    );
}

#[test]
fn duplicate_key_in_inline_table_inside_array() {
    check_error(
        "a = [{b = 1, b = 2}]",
        ParseError::DuplicateKey {
            path: fmt_str("a[0].b"),
            orig: span(0, 6, 7),
            duplicate: span(0, 13, 14),
        },
    );
}

#[test]
fn dotted_key_over_value() {
    check_error(
        "a = 1\na.b = 2",
        ParseError::NotATable {
            path: fmt_str("a"),
            found: NodeKind::Integer,
            orig: span(0, 0, 1),
            new: span(1, 0, 1),
        },
    );
}

#[test]
fn table_redefinition() {
    check_error(
        "[a]\n[a]",
        ParseError::TableRedefinition {
            path: fmt_str("a"),
            orig: span(0, 1, 2),
            new: span(1, 1, 2),
        },
    );
}

#[test]
fn header_over_dotted_table() {
    check_error(
        "[a]\nb.c = 1\n[a.b]",
        ParseError::TableRedefinition {
            path: fmt_str("a.b"),
            orig: span(1, 0, 1),
            new: span(2, 3, 4),
        },
    );
}

#[test]
fn table_over_array_of_tables() {
    check_error(
        "[[a]]\n[a]",
        ParseError::TableRedefinition {
            path: fmt_str("a"),
            orig: span(0, 2, 3),
            new: span(1, 1, 2),
        },
    );
}

#[test]
fn header_over_value() {
    check_error(
        "a = 1\n[a]",
        ParseError::DuplicateKey {
            path: fmt_str("a"),
            orig: span(0, 0, 1),
            duplicate: span(1, 1, 2),
        },
    );
}

#[test]
fn header_through_value() {
    check_error(
        "a = 1\n[a.b]",
        ParseError::NotATable {
            path: fmt_str("a"),
            found: NodeKind::Integer,
            orig: span(0, 0, 1),
            new: span(1, 1, 2),
        },
    );
}

#[test]
fn extend_inline_table_with_header() {
    check_error(
        "a = {}\n[a]",
        ParseError::CannotExtendInlineTable {
            path: fmt_str("a"),
            orig: span(0, 0, 1),
            new: span(1, 1, 2),
        },
    );
}

#[test]
fn extend_inline_table_with_dotted_key() {
    check_error(
        "a = { b = 1 }\na.c = 2",
        ParseError::CannotExtendInlineTable {
            path: fmt_str("a"),
            orig: span(0, 0, 1),
            new: span(1, 0, 1),
        },
    );
}

#[test]
fn extend_inline_array() {
    check_error(
        "a = [1]\n[[a]]",
        ParseError::CannotExtendInlineArray {
            path: fmt_str("a"),
            orig: span(0, 0, 1),
            new: span(1, 2, 3),
        },
    );
}

#[test]
fn array_of_tables_over_table() {
    check_error(
        "[a]\n[[a]]",
        ParseError::NotAnArrayOfTables {
            path: fmt_str("a"),
            found: NodeKind::Table,
            orig: span(0, 1, 2),
            new: span(1, 2, 3),
        },
    );
}

#[test]
fn dotted_key_over_header_table() {
    check_error(
        "[a.b]\n[a]\nb.c = 1",
        ParseError::CannotExtendTableWithDottedKey {
            path: fmt_str("a.b"),
            orig: span(0, 3, 4),
            new: span(2, 0, 1),
        },
    );
}

#[test]
fn dotted_key_over_array_of_tables() {
    check_error(
        "[[a.b]]\n[a]\nb.c = 1",
        ParseError::CannotExtendArrayWithDottedKey {
            path: fmt_str("a.b"),
            orig: span(0, 4, 5),
            new: span(2, 0, 1),
        },
    );
}

#[test]
fn path_segments_are_quoted_when_not_bare() {
    let mut path = String::new();
    push_path_segment(&mut path, "a");
    push_path_segment(&mut path, "b c");
    push_path_segment(&mut path, "");
    push_path_segment(&mut path, "d\n");
    assert_eq!(path, "a.'b c'.''.'d\\n'");
}
