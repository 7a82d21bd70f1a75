use std::fmt::Write;

use crate::datetime::{Date, LocalDateTime, OffsetDateTime, Time};
use crate::lex::escape_string;
use crate::value::{Array, Node, Scalar, Table, TableArray};
use crate::visit::{Accept, Visitor};

/// Prints a document as TOML.
///
/// Scalars and arrays of a table are written as `key = value` lines, followed by its sub-tables
/// as `[a.b]` sections and its arrays of tables as `[[a.b]]` sections. Tables and arrays of
/// tables nested inside arrays are written inline.
pub struct TomlWriter<'a, W> {
    out: &'a mut W,
    /// Formatted keys of the section currently being written.
    path: Vec<String>,
    /// Greater than zero while writing a value on the right side of `=`.
    inline_depth: usize,
    written: bool,
}

impl<'a, W: Write> TomlWriter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self {
            out,
            path: Vec::new(),
            inline_depth: 0,
            written: false,
        }
    }

    fn header(&mut self, open: &str, close: &str) -> std::fmt::Result {
        if self.written {
            self.out.write_char('\n')?;
        }
        writeln!(self.out, "{open}{}{close}", self.path.join("."))?;
        self.written = true;
        Ok(())
    }

    fn inline(&mut self, node: &Node) -> std::fmt::Result {
        self.inline_depth += 1;
        let res = node.accept(self);
        self.inline_depth -= 1;
        res
    }

    fn inline_table(&mut self, table: &Table) -> std::fmt::Result {
        if table.is_empty() {
            return self.out.write_str("{}");
        }

        self.out.write_str("{ ")?;
        for (i, (key, node)) in table.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            write_key(self.out, key)?;
            self.out.write_str(" = ")?;
            self.inline(node)?;
        }
        self.out.write_str(" }")
    }
}

impl<W: Write> Visitor for TomlWriter<'_, W> {
    type Output = std::fmt::Result;

    fn visit_string(&mut self, val: &Scalar<String>) -> Self::Output {
        write!(self.out, "\"{}\"", escape_string(val.get()))
    }

    fn visit_integer(&mut self, val: &Scalar<i64>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_float(&mut self, val: &Scalar<f64>) -> Self::Output {
        super::fmt_float(self.out, *val.get())
    }

    fn visit_bool(&mut self, val: &Scalar<bool>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_local_date(&mut self, val: &Scalar<Date>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_local_time(&mut self, val: &Scalar<Time>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_local_datetime(&mut self, val: &Scalar<LocalDateTime>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_offset_datetime(&mut self, val: &Scalar<OffsetDateTime>) -> Self::Output {
        write!(self.out, "{}", val.get())
    }

    fn visit_array(&mut self, array: &Array) -> Self::Output {
        self.out.write_char('[')?;
        for (i, node) in array.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.inline(node)?;
        }
        self.out.write_char(']')
    }

    fn visit_table_array(&mut self, array: &TableArray) -> Self::Output {
        if self.inline_depth > 0 {
            self.out.write_char('[')?;
            for (i, table) in array.iter().enumerate() {
                if i > 0 {
                    self.out.write_str(", ")?;
                }
                self.inline_table(table)?;
            }
            return self.out.write_char(']');
        }

        for table in array.iter() {
            self.header("[[", "]]")?;
            table.accept(self)?;
        }
        Ok(())
    }

    fn visit_table(&mut self, table: &Table) -> Self::Output {
        if self.inline_depth > 0 {
            return self.inline_table(table);
        }

        for (key, node) in table.iter().filter(|(_, n)| !is_section(n)) {
            write_key(self.out, key)?;
            self.out.write_str(" = ")?;
            self.inline(node)?;
            self.out.write_char('\n')?;
            self.written = true;
        }

        for (key, node) in table.iter().filter(|(_, n)| is_section(n)) {
            let mut segment = String::new();
            write_key(&mut segment, key)?;
            self.path.push(segment);

            match node {
                Node::Table(t) => {
                    self.header("[", "]")?;
                    t.accept(self)?;
                }
                Node::TableArray(a) => a.accept(self)?,
                _ => (),
            }

            self.path.pop();
        }
        Ok(())
    }
}

fn is_section(node: &Node) -> bool {
    matches!(node, Node::Table(_) | Node::TableArray(_))
}

fn write_key(f: &mut impl Write, key: &str) -> std::fmt::Result {
    if super::is_bare_key(key) {
        f.write_str(key)
    } else {
        write!(f, "\"{}\"", escape_string(key))
    }
}
