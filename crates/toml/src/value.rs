//! The document model: an owned, insertion-ordered tree of typed nodes.

use std::ops::{Deref, Index};

use indexmap::IndexMap;

use crate::datetime::{Date, LocalDateTime, OffsetDateTime, Time};

/// An immutable typed leaf value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar<T>(T);

impl<T> Scalar<T> {
    pub fn new(val: T) -> Self {
        Self(val)
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Scalar<T> {
    fn from(val: T) -> Self {
        Self(val)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    String,
    Integer,
    Float,
    Boolean,
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
    Array,
    TableArray,
    Table,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::String => "string",
            NodeKind::Integer => "integer",
            NodeKind::Float => "float",
            NodeKind::Boolean => "boolean",
            NodeKind::LocalDate => "local date",
            NodeKind::LocalTime => "local time",
            NodeKind::LocalDateTime => "local date-time",
            NodeKind::OffsetDateTime => "offset date-time",
            NodeKind::Array => "array",
            NodeKind::TableArray => "array of tables",
            NodeKind::Table => "table",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    String(Scalar<String>),
    Integer(Scalar<i64>),
    Float(Scalar<f64>),
    Boolean(Scalar<bool>),
    LocalDate(Scalar<Date>),
    LocalTime(Scalar<Time>),
    LocalDateTime(Scalar<LocalDateTime>),
    OffsetDateTime(Scalar<OffsetDateTime>),
    Array(Array),
    TableArray(TableArray),
    Table(Table),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::String(_) => NodeKind::String,
            Node::Integer(_) => NodeKind::Integer,
            Node::Float(_) => NodeKind::Float,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::LocalDate(_) => NodeKind::LocalDate,
            Node::LocalTime(_) => NodeKind::LocalTime,
            Node::LocalDateTime(_) => NodeKind::LocalDateTime,
            Node::OffsetDateTime(_) => NodeKind::OffsetDateTime,
            Node::Array(_) => NodeKind::Array,
            Node::TableArray(_) => NodeKind::TableArray,
            Node::Table(_) => NodeKind::Table,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s.get()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Node::Integer(i) => Some(*i.get()),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Float(f) => Some(*f.get()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b.get()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table_array(&self) -> Option<&TableArray> {
        match self {
            Node::TableArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(val: $ty) -> Self {
                    Node::$variant(Scalar(val))
                }
            }
        )*
    };
}

impl_from_scalar! {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    LocalDate(Date),
    LocalTime(Time),
    LocalDateTime(LocalDateTime),
    OffsetDateTime(OffsetDateTime),
}

impl From<&str> for Node {
    fn from(val: &str) -> Self {
        Node::String(Scalar(val.to_owned()))
    }
}

/// A key to node mapping that iterates in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    entries: IndexMap<String, Node>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Node)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Index<&str> for Table {
    type Output = Node;

    fn index(&self, key: &str) -> &Self::Output {
        &self.entries[key]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    values: Vec<Node>,
}

impl Array {
    pub fn new(values: Vec<Node>) -> Self {
        Self { values }
    }

    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.values.iter()
    }
}

impl Index<usize> for Array {
    type Output = Node;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// The tables of repeated `[[name]]` headers, in order of appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableArray {
    tables: Vec<Table>,
}

impl TableArray {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get(&self, idx: usize) -> Option<&Table> {
        self.tables.get(idx)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }
}

impl Index<usize> for TableArray {
    type Output = Table;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.tables[idx]
    }
}

impl<'a> IntoIterator for &'a TableArray {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

/// The root table of a successfully parsed input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    root: Table,
}

impl Document {
    pub fn new(root: Table) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn into_root(self) -> Table {
        self.root
    }
}

impl Deref for Document {
    type Target = Table;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}
