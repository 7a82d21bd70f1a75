//! The typed JSON encoding used by conformance test suites.
//!
//! Every scalar becomes `{"type":"<kind>","value":"<text>"}`, arrays become
//! `{"type":"array","value":[...]}`, arrays of tables become plain JSON arrays and tables plain
//! JSON objects in insertion order.

use std::fmt::Write;

use crate::datetime::{Date, LocalDateTime, OffsetDateTime, Time};
use crate::lex::escape_string;
use crate::value::{Array, Scalar, Table, TableArray};
use crate::visit::{Accept, Visitor};

pub struct JsonWriter<'a, W> {
    out: &'a mut W,
}

impl<'a, W: Write> JsonWriter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    fn typed(&mut self, ty: &str, val: impl std::fmt::Display) -> std::fmt::Result {
        write!(self.out, "{{\"type\":\"{ty}\",\"value\":\"{val}\"}}")
    }
}

impl<W: Write> Visitor for JsonWriter<'_, W> {
    type Output = std::fmt::Result;

    fn visit_string(&mut self, val: &Scalar<String>) -> Self::Output {
        self.typed("string", escape_string(val.get()))
    }

    fn visit_integer(&mut self, val: &Scalar<i64>) -> Self::Output {
        self.typed("integer", val.get())
    }

    fn visit_float(&mut self, val: &Scalar<f64>) -> Self::Output {
        let mut text = String::new();
        super::fmt_float(&mut text, *val.get())?;
        self.typed("float", text)
    }

    fn visit_bool(&mut self, val: &Scalar<bool>) -> Self::Output {
        self.typed("bool", val.get())
    }

    fn visit_local_date(&mut self, val: &Scalar<Date>) -> Self::Output {
        self.typed("local_date", val.get())
    }

    fn visit_local_time(&mut self, val: &Scalar<Time>) -> Self::Output {
        self.typed("local_time", val.get())
    }

    fn visit_local_datetime(&mut self, val: &Scalar<LocalDateTime>) -> Self::Output {
        self.typed("local_datetime", val.get())
    }

    fn visit_offset_datetime(&mut self, val: &Scalar<OffsetDateTime>) -> Self::Output {
        self.typed("datetime", val.get())
    }

    fn visit_array(&mut self, array: &Array) -> Self::Output {
        self.out.write_str("{\"type\":\"array\",\"value\":[")?;
        for (i, node) in array.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            node.accept(self)?;
        }
        self.out.write_str("]}")
    }

    fn visit_table_array(&mut self, array: &TableArray) -> Self::Output {
        self.out.write_char('[')?;
        for (i, table) in array.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            table.accept(self)?;
        }
        self.out.write_char(']')
    }

    fn visit_table(&mut self, table: &Table) -> Self::Output {
        self.out.write_char('{')?;
        for (i, (key, node)) in table.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            write!(self.out, "\"{}\": ", escape_string(key))?;
            node.accept(self)?;
        }
        self.out.write_char('}')
    }
}
