//! Double dispatch over the closed set of node kinds.
//!
//! A consumer implements [`Visitor`] once, with one method per concrete kind, and calls
//! [`Accept::accept`] on any node. The node picks the matching method, so consumers never match
//! on [`Node`] themselves.
//!
//! ```
//! use streamtoml::datetime::{Date, LocalDateTime, OffsetDateTime, Time};
//! use streamtoml::{Accept, Array, Scalar, Table, TableArray, Visitor};
//!
//! /// Counts the scalars of a document.
//! struct Count;
//!
//! impl Visitor for Count {
//!     type Output = usize;
//!
//!     fn visit_string(&mut self, _: &Scalar<String>) -> usize { 1 }
//!     fn visit_integer(&mut self, _: &Scalar<i64>) -> usize { 1 }
//!     fn visit_float(&mut self, _: &Scalar<f64>) -> usize { 1 }
//!     fn visit_bool(&mut self, _: &Scalar<bool>) -> usize { 1 }
//!     fn visit_local_date(&mut self, _: &Scalar<Date>) -> usize { 1 }
//!     fn visit_local_time(&mut self, _: &Scalar<Time>) -> usize { 1 }
//!     fn visit_local_datetime(&mut self, _: &Scalar<LocalDateTime>) -> usize { 1 }
//!     fn visit_offset_datetime(&mut self, _: &Scalar<OffsetDateTime>) -> usize { 1 }
//!     fn visit_array(&mut self, array: &Array) -> usize {
//!         array.iter().map(|n| n.accept(self)).sum()
//!     }
//!     fn visit_table_array(&mut self, array: &TableArray) -> usize {
//!         array.iter().map(|t| t.accept(self)).sum()
//!     }
//!     fn visit_table(&mut self, table: &Table) -> usize {
//!         table.iter().map(|(_, n)| n.accept(self)).sum()
//!     }
//! }
//!
//! let doc = streamtoml::from_str("a = 1\nb = [2, 3]\n[c]\nd = 'e'").unwrap();
//! assert_eq!(doc.accept(&mut Count), 4);
//! ```

use crate::datetime::{Date, LocalDateTime, OffsetDateTime, Time};
use crate::value::{Array, Document, Node, Scalar, Table, TableArray};

pub trait Visitor {
    type Output;

    fn visit_string(&mut self, val: &Scalar<String>) -> Self::Output;
    fn visit_integer(&mut self, val: &Scalar<i64>) -> Self::Output;
    fn visit_float(&mut self, val: &Scalar<f64>) -> Self::Output;
    fn visit_bool(&mut self, val: &Scalar<bool>) -> Self::Output;
    fn visit_local_date(&mut self, val: &Scalar<Date>) -> Self::Output;
    fn visit_local_time(&mut self, val: &Scalar<Time>) -> Self::Output;
    fn visit_local_datetime(&mut self, val: &Scalar<LocalDateTime>) -> Self::Output;
    fn visit_offset_datetime(&mut self, val: &Scalar<OffsetDateTime>) -> Self::Output;
    fn visit_array(&mut self, array: &Array) -> Self::Output;
    fn visit_table_array(&mut self, array: &TableArray) -> Self::Output;
    /// Entries are visited in insertion order.
    fn visit_table(&mut self, table: &Table) -> Self::Output;
}

pub trait Accept {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

impl Accept for Node {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Node::String(s) => visitor.visit_string(s),
            Node::Integer(i) => visitor.visit_integer(i),
            Node::Float(f) => visitor.visit_float(f),
            Node::Boolean(b) => visitor.visit_bool(b),
            Node::LocalDate(d) => visitor.visit_local_date(d),
            Node::LocalTime(t) => visitor.visit_local_time(t),
            Node::LocalDateTime(dt) => visitor.visit_local_datetime(dt),
            Node::OffsetDateTime(dt) => visitor.visit_offset_datetime(dt),
            Node::Array(a) => visitor.visit_array(a),
            Node::TableArray(a) => visitor.visit_table_array(a),
            Node::Table(t) => visitor.visit_table(t),
        }
    }
}

macro_rules! impl_accept {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Accept for $ty {
                #[inline]
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

impl_accept! {
    Scalar<String> => visit_string,
    Scalar<i64> => visit_integer,
    Scalar<f64> => visit_float,
    Scalar<bool> => visit_bool,
    Scalar<Date> => visit_local_date,
    Scalar<Time> => visit_local_time,
    Scalar<LocalDateTime> => visit_local_datetime,
    Scalar<OffsetDateTime> => visit_offset_datetime,
    Array => visit_array,
    TableArray => visit_table_array,
    Table => visit_table,
}

impl Accept for Document {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_table(self.root())
    }
}
