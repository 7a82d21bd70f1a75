//! Assembles parsed headers and assignments into a document, enforcing the table rules.
//!
//! ## Structure
//! - [MapTable] // root
//!     - "a": [MapTableEntry]
//!         - node: [MapNode::Table] (kind: [TableKind::Header])
//!             - "b": [MapTableEntry]
//!                 - node: [MapNode::Frozen] // `b = 1`
//!     - "c": [MapTableEntry]
//!         - node: [MapNode::TableArray]
//!
//! A table remembers how it came into existence, since that decides how it may be extended later:
//! ```toml
//! [x.y.z] # `x` and `y` are implicit, they may still be defined by a header
//! [x]
//! a.b = 1 # `a` is dotted, it may receive more dotted keys but no header
//! c = { d = 1 } # `c` is frozen, nothing may extend it
//! ```

use indexmap::map::Entry;
use indexmap::IndexMap;

use common::{FmtChar, FmtStr, Span};

use crate::error::{Error, ParseError};
use crate::parse::{Assignment, Ast, Ident, Key, Value};
use crate::value::{Array, Document, Node, NodeKind, Table, TableArray};

#[cfg(test)]
mod test;

#[derive(Debug, Default, PartialEq)]
pub struct MapTable {
    entries: IndexMap<String, MapTableEntry>,
}

impl MapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MapTableEntry> {
        self.entries.get(key)
    }

    pub fn into_table(self) -> Table {
        (self.entries.into_iter())
            .map(|(k, e)| (k, e.node.into_node()))
            .collect()
    }
}

#[derive(Debug, PartialEq)]
pub struct MapTableEntry {
    pub node: MapNode,
    /// The key that defined this entry, or the header that made an implicit table explicit.
    pub span: Span,
}

impl MapTableEntry {
    fn new(node: MapNode, span: Span) -> Self {
        Self { node, span }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// Created as an intermediate table of a header, may be defined later on.
    Implicit,
    Header,
    Dotted,
}

#[derive(Debug, PartialEq)]
pub enum MapNode {
    Table(MapTable, TableKind),
    TableArray(Vec<MapTable>),
    /// A value assigned with `=`, nothing may be added to it afterwards.
    Frozen(Node),
}

impl MapNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            MapNode::Table(..) => NodeKind::Table,
            MapNode::TableArray(_) => NodeKind::TableArray,
            MapNode::Frozen(n) => n.kind(),
        }
    }

    fn into_node(self) -> Node {
        match self {
            MapNode::Table(t, _) => Node::Table(t.into_table()),
            MapNode::TableArray(a) => {
                let tables = a.into_iter().map(MapTable::into_table).collect();
                Node::TableArray(TableArray::new(tables))
            }
            MapNode::Frozen(n) => n,
        }
    }
}

/// Receives top-level items in document order.
#[derive(Debug, Default)]
pub struct MapBuilder {
    root: MapTable,
    /// Keys of the last header, table arrays resolve to their last element.
    current: Vec<String>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ast: Ast) -> Result<(), Error> {
        match ast {
            Ast::Table(key) => self.insert_table(key),
            Ast::ArrayEntry(key) => self.insert_array_entry(key),
            Ast::Assignment(assignment) => {
                let path = fmt_path(&self.current);
                let table = self.current_table()?;
                insert_assignment(table, &path, assignment)
            }
        }
    }

    pub fn finish(self) -> Document {
        Document::new(self.root.into_table())
    }

    fn insert_table(&mut self, key: Key) -> Result<(), Error> {
        let (last, table, path) = descend_header(&mut self.root, &key)?;

        match table.entries.entry(last.text.clone()) {
            Entry::Vacant(v) => {
                let node = MapNode::Table(MapTable::new(), TableKind::Header);
                v.insert(MapTableEntry::new(node, last.span));
            }
            Entry::Occupied(mut o) => {
                let entry = o.get_mut();
                match &mut entry.node {
                    MapNode::Table(_, kind @ TableKind::Implicit) => {
                        *kind = TableKind::Header;
                        entry.span = last.span;
                    }
                    MapNode::Table(..) | MapNode::TableArray(_) => {
                        return Err(ParseError::TableRedefinition {
                            path: FmtStr::from(path),
                            orig: entry.span,
                            new: last.span,
                        }
                        .into());
                    }
                    MapNode::Frozen(n @ (Node::Table(_) | Node::Array(_))) => {
                        return Err(frozen_error(n.kind(), path, entry.span, last.span));
                    }
                    MapNode::Frozen(_) => {
                        return Err(ParseError::DuplicateKey {
                            path: FmtStr::from(path),
                            orig: entry.span,
                            duplicate: last.span,
                        }
                        .into());
                    }
                }
            }
        }

        tracing::trace!(path = %key_path(&key), "table header");
        self.current = key.idents.into_iter().map(|i| i.text).collect();
        Ok(())
    }

    fn insert_array_entry(&mut self, key: Key) -> Result<(), Error> {
        let (last, table, path) = descend_header(&mut self.root, &key)?;

        match table.entries.entry(last.text.clone()) {
            Entry::Vacant(v) => {
                let node = MapNode::TableArray(vec![MapTable::new()]);
                v.insert(MapTableEntry::new(node, last.span));
            }
            Entry::Occupied(mut o) => {
                let entry = o.get_mut();
                match &mut entry.node {
                    MapNode::TableArray(tables) => tables.push(MapTable::new()),
                    MapNode::Frozen(Node::Array(_)) => {
                        return Err(ParseError::CannotExtendInlineArray {
                            path: FmtStr::from(path),
                            orig: entry.span,
                            new: last.span,
                        }
                        .into());
                    }
                    node => {
                        return Err(ParseError::NotAnArrayOfTables {
                            path: FmtStr::from(path),
                            found: node.kind(),
                            orig: entry.span,
                            new: last.span,
                        }
                        .into());
                    }
                }
            }
        }

        tracing::trace!(path = %key_path(&key), "array of tables entry");
        self.current = key.idents.into_iter().map(|i| i.text).collect();
        Ok(())
    }

    /// Walks the path of the last header again, it was validated when the header was inserted.
    fn current_table(&mut self) -> Result<&mut MapTable, Error> {
        let mut table = &mut self.root;
        for key in self.current.iter() {
            let node = table.entries.get_mut(key).map(|e| &mut e.node);
            table = match node {
                Some(MapNode::Table(t, _)) => t,
                Some(MapNode::TableArray(tables)) => match tables.last_mut() {
                    Some(t) => t,
                    None => return Err(Error::Internal(format!("empty array of tables `{key}`"))),
                },
                _ => return Err(Error::Internal(format!("current table `{key}` vanished"))),
            };
        }
        Ok(table)
    }
}

/// Descends the intermediate keys of a `[header]` or `[[header]]`, creating implicit tables on the
/// way. Returns the last key, the table it belongs in and the formatted path of the whole key.
fn descend_header<'a, 'k>(
    root: &'a mut MapTable,
    key: &'k Key,
) -> Result<(&'k Ident, &'a mut MapTable, String), Error> {
    let Some((last, intermediates)) = key.idents.split_last() else {
        return Err(Error::Internal("empty header key".into()));
    };

    let mut path = String::new();
    let mut table = root;
    for ident in intermediates {
        push_path_segment(&mut path, &ident.text);

        let entry = (table.entries.entry(ident.text.clone())).or_insert_with(|| {
            let node = MapNode::Table(MapTable::new(), TableKind::Implicit);
            MapTableEntry::new(node, ident.span)
        });
        table = match &mut entry.node {
            MapNode::Table(t, _) => t,
            MapNode::TableArray(tables) => match tables.last_mut() {
                Some(t) => t,
                None => return Err(Error::Internal(format!("empty array of tables `{path}`"))),
            },
            MapNode::Frozen(n) => {
                return Err(frozen_error(n.kind(), path, entry.span, ident.span));
            }
        };
    }

    push_path_segment(&mut path, &last.text);
    Ok((last, table, path))
}

/// Inserts a `key = value` pair relative to `table`, whose own path is `prefix`.
fn insert_assignment(
    table: &mut MapTable,
    prefix: &str,
    assignment: Assignment,
) -> Result<(), Error> {
    let Assignment { key, value } = assignment;
    let Some((last, intermediates)) = key.idents.split_last() else {
        return Err(Error::Internal("empty assignment key".into()));
    };

    let mut path = prefix.to_owned();
    let mut table = table;
    for ident in intermediates {
        push_path_segment(&mut path, &ident.text);

        let entry = (table.entries.entry(ident.text.clone())).or_insert_with(|| {
            let node = MapNode::Table(MapTable::new(), TableKind::Dotted);
            MapTableEntry::new(node, ident.span)
        });
        table = match &mut entry.node {
            MapNode::Table(t, TableKind::Dotted) => t,
            MapNode::Table(..) => {
                return Err(ParseError::CannotExtendTableWithDottedKey {
                    path: FmtStr::from(path),
                    orig: entry.span,
                    new: ident.span,
                }
                .into());
            }
            MapNode::TableArray(_) => {
                return Err(ParseError::CannotExtendArrayWithDottedKey {
                    path: FmtStr::from(path),
                    orig: entry.span,
                    new: ident.span,
                }
                .into());
            }
            MapNode::Frozen(n) => {
                return Err(frozen_error(n.kind(), path, entry.span, ident.span));
            }
        };
    }

    push_path_segment(&mut path, &last.text);
    match table.entries.entry(last.text.clone()) {
        Entry::Occupied(o) => Err(ParseError::DuplicateKey {
            path: FmtStr::from(path),
            orig: o.get().span,
            duplicate: last.span,
        }
        .into()),
        Entry::Vacant(v) => {
            tracing::trace!(path = %path, "assignment");
            let node = map_value(&path, value)?;
            v.insert(MapTableEntry::new(MapNode::Frozen(node), last.span));
            Ok(())
        }
    }
}

fn map_value(path: &str, value: Value) -> Result<Node, Error> {
    match value {
        Value::Scalar(node, _) => Ok(node),
        Value::InlineArray(array) => {
            let values = (array.values.into_iter().enumerate())
                .map(|(i, v)| map_value(&format!("{path}[{i}]"), v))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::Array(Array::new(values)))
        }
        Value::InlineTable(inline) => {
            let mut table = MapTable::new();
            for assignment in inline.assignments {
                insert_assignment(&mut table, path, assignment)?;
            }
            Ok(Node::Table(table.into_table()))
        }
    }
}

fn frozen_error(kind: NodeKind, path: String, orig: Span, new: Span) -> Error {
    let path = FmtStr::from(path);
    let error = match kind {
        NodeKind::Table => ParseError::CannotExtendInlineTable { path, orig, new },
        NodeKind::Array => ParseError::CannotExtendInlineArray { path, orig, new },
        found => ParseError::NotATable {
            path,
            found,
            orig,
            new,
        },
    };
    error.into()
}

fn key_path(key: &Key) -> String {
    let mut path = String::new();
    for ident in key.idents.iter() {
        push_path_segment(&mut path, &ident.text);
    }
    path
}

fn fmt_path(keys: &[String]) -> String {
    let mut path = String::new();
    for k in keys {
        push_path_segment(&mut path, k);
    }
    path
}

fn push_path_segment(path: &mut String, key: &str) {
    if !path.is_empty() {
        path.push('.');
    }
    fmt_path_segment(path, key);
}

/// Bare keys are written as is, any other key is quoted.
fn fmt_path_segment(f: &mut String, key: &str) {
    use std::fmt::Write as _;

    let is_bare = !key.is_empty()
        && (key.chars()).all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-'));
    if is_bare {
        f.push_str(key);
        return;
    }

    f.push('\'');
    for c in key.chars() {
        _ = write!(f, "{}", FmtChar(c));
    }
    f.push('\'');
}

