//! The recursive serializer.
//!
//! Layout protocol: every `write_*` method returns true when it ended with
//! its own newline, so callers know whether to add one. The `is_map_value`
//! flag suppresses leading indentation for values that follow their key on
//! the same line.

use uxf_model::{List, Map, Table, TClass, Uxf, Value};
use uxf_util::{text, MAX_LIST_IN_LINE, MAX_SHORT_LEN, UXF_VERSION};

/// Writer layout settings.
#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Indent width, 0 to 8; out-of-range values silently become the
    /// default of 2.
    pub indent: usize,
}

impl WriteOptions {
    /// Creates options with the given indent.
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    fn sanitized_indent(&self) -> usize {
        if self.indent <= 8 {
            self.indent
        } else {
            uxf_util::DEFAULT_INDENT
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: uxf_util::DEFAULT_INDENT,
        }
    }
}

/// Serializes `uxo` with the default layout settings.
pub fn write_document(uxo: &Uxf) -> String {
    write_document_with(uxo, &WriteOptions::default())
}

/// Serializes `uxo`.
pub fn write_document_with(uxo: &Uxf, options: &WriteOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        pad: " ".repeat(options.sanitized_indent()),
    };
    writer.write_uxf(uxo);
    writer.out
}

struct Writer {
    out: String,
    pad: String,
}

impl Writer {
    fn write_uxf(&mut self, uxo: &Uxf) {
        self.write_header(&uxo.custom);
        if let Some(comment) = &uxo.comment {
            self.out.push_str(&format!("#<{}>\n", text::escape(comment)));
        }
        if !uxo.imports.is_empty() {
            self.write_imports(uxo);
        }
        if !uxo.tclasses.is_empty() {
            self.write_tclasses(uxo);
        }
        let pad = self.pad.clone();
        if !self.write_value(uxo.value(), 0, &pad, false) {
            self.out.push('\n');
        }
    }

    fn write_header(&mut self, custom: &str) {
        self.out.push_str(&format!("uxf {UXF_VERSION:.1}"));
        if !custom.is_empty() {
            self.out.push(' ');
            self.out.push_str(custom);
        }
        self.out.push('\n');
    }

    /// Import lines in first-encountered order with duplicates removed;
    /// never sorted, so later imports keep overriding earlier ones.
    fn write_imports(&mut self, uxo: &Uxf) {
        for filename in uxo.import_filenames() {
            self.out.push_str(&format!("!{filename}\n"));
        }
    }

    /// TClass definitions in case-insensitive ttype order, skipping any
    /// that an import supplies.
    fn write_tclasses(&mut self, uxo: &Uxf) {
        let mut tclasses: Vec<&TClass> = uxo.tclasses.values().collect();
        tclasses.sort_by(|a, b| {
            (a.ttype().to_uppercase(), a.ttype()).cmp(&(b.ttype().to_uppercase(), b.ttype()))
        });
        for tclass in tclasses {
            if uxo.imports.contains_key(tclass.ttype()) {
                continue;
            }
            self.out.push('=');
            if let Some(comment) = &tclass.comment {
                self.out
                    .push_str(&format!("#<{}> ", text::escape(comment)));
            }
            self.out.push_str(tclass.ttype());
            for field in tclass.fields() {
                self.out.push(' ');
                self.out.push_str(field.name());
                if let Some(vtype) = &field.vtype {
                    self.out.push(':');
                    self.out.push_str(vtype);
                }
            }
            self.out.push('\n');
        }
    }

    fn write_value(&mut self, value: &Value, indent: usize, pad: &str, is_map_value: bool) -> bool {
        match value {
            Value::List(list) => self.write_list(list, indent, pad, is_map_value),
            Value::Map(map) => self.write_map(map, indent, pad, is_map_value),
            Value::Table(table) => self.write_table(table, indent, pad, is_map_value),
            scalar => self.write_scalar(scalar, indent, pad, is_map_value),
        }
    }

    fn write_list(&mut self, list: &List, indent: usize, pad: &str, is_map_value: bool) -> bool {
        let tab = if is_map_value {
            String::new()
        } else {
            pad.repeat(indent)
        };
        let prefix = list_prefix(list);
        if list.is_empty() {
            self.out.push_str(&format!("{tab}[{prefix}]"));
            return false;
        }
        self.out.push_str(&format!("{tab}[{prefix}"));
        if list.len() == 1 || (list.len() <= MAX_LIST_IN_LINE && are_short(list.iter())) {
            let sep = if prefix.is_empty() { "" } else { " " };
            return self.write_short_list(sep, list);
        }
        self.write_list_items(list, indent, pad)
    }

    fn write_short_list(&mut self, first_sep: &str, list: &List) -> bool {
        let mut sep = first_sep;
        for value in list {
            self.out.push_str(sep);
            self.write_value(value, 0, "", false);
            sep = " ";
        }
        self.out.push(']');
        false
    }

    fn write_list_items(&mut self, list: &List, indent: usize, pad: &str) -> bool {
        self.out.push('\n');
        let indent = indent + 1;
        for value in list {
            if !self.write_value(value, indent, pad, false) {
                self.out.push('\n');
            }
        }
        self.out.push_str(&format!("{}]\n", pad.repeat(indent - 1)));
        true
    }

    fn write_map(&mut self, map: &Map, indent: usize, pad: &str, is_map_value: bool) -> bool {
        let tab = if is_map_value {
            String::new()
        } else {
            pad.repeat(indent)
        };
        let prefix = map_prefix(map);
        if map.is_empty() {
            self.out.push_str(&format!("{tab}{{{prefix}}}"));
            return false;
        }
        if map.len() == 1 {
            return self.write_single_item_map(&tab, &prefix, map);
        }
        self.write_map_items(&tab, &prefix, map, indent, pad)
    }

    fn write_single_item_map(&mut self, tab: &str, prefix: &str, map: &Map) -> bool {
        self.out.push_str(&format!("{tab}{{{prefix}"));
        let (key, value) = match map.items().iter().next() {
            Some(item) => item,
            None => return false,
        };
        let key = Value::from(key.clone());
        self.write_scalar(&key, 1, " ", false);
        self.out.push(' ');
        if self.write_value(value, 1, " ", true) {
            self.out.push_str(tab);
        }
        self.out.push('}');
        if value.is_scalar() {
            return false;
        }
        self.out.push('\n');
        true
    }

    fn write_map_items(
        &mut self,
        tab: &str,
        prefix: &str,
        map: &Map,
        indent: usize,
        pad: &str,
    ) -> bool {
        self.out.push_str(&format!("{tab}{{{prefix}\n"));
        let indent = indent + 1;
        for (key, value) in map {
            let key = Value::from(key.clone());
            self.write_scalar(&key, indent, pad, false);
            self.out.push(' ');
            if !self.write_value(value, indent, pad, true) {
                self.out.push('\n');
            }
        }
        self.out.push_str(&format!("{}}}\n", pad.repeat(indent - 1)));
        true
    }

    fn write_table(&mut self, table: &Table, indent: usize, pad: &str, is_map_value: bool) -> bool {
        let tab = if is_map_value {
            String::new()
        } else {
            pad.repeat(indent)
        };
        let prefix = table_prefix(table);
        self.out.push_str(&format!("{tab}({prefix}"));
        if table.is_empty() {
            self.out.push(')');
            return false;
        }
        if table.len() == 1 {
            self.out.push(' ');
            if let Some(record) = table.first() {
                self.write_record(record, is_map_value);
            }
            self.out.push(')');
            return false;
        }
        self.out.push('\n');
        let indent = indent + 1;
        let row_tab = pad.repeat(indent);
        for record in table.records() {
            self.out.push_str(&row_tab);
            if !self.write_record(record, is_map_value) {
                self.out.push('\n');
            }
        }
        self.out.push_str(&format!("{})\n", pad.repeat(indent - 1)));
        true
    }

    fn write_record(&mut self, record: &[Value], is_map_value: bool) -> bool {
        let mut wrote_newline = false;
        let mut sep = "";
        for value in record {
            self.out.push_str(sep);
            wrote_newline = self.write_value(value, 0, "", is_map_value);
            sep = " ";
        }
        wrote_newline
    }

    fn write_scalar(&mut self, value: &Value, indent: usize, pad: &str, is_map_value: bool) -> bool {
        if !is_map_value {
            self.out.push_str(&pad.repeat(indent));
        }
        self.out.push_str(&scalar_text(value));
        false
    }
}

/// The one-token text of a scalar value.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "?".to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Real(r) => {
            let mut text = r.to_string();
            if !text.contains('.') && !text.contains('e') && !text.contains('E') {
                text.push_str(".0");
            }
            text
        }
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Value::Str(s) => format!("<{}>", text::escape(s)),
        Value::Bytes(b) => {
            let mut hex = String::with_capacity(b.len() * 2 + 4);
            hex.push_str("(:");
            for byte in b {
                hex.push_str(&format!("{byte:02X}"));
            }
            hex.push_str(":)");
            hex
        }
        other => other.type_name().to_string(),
    }
}

fn list_prefix(list: &List) -> String {
    join_prefix(&[
        list.comment.as_deref().map(comment_part),
        list.vtype.clone(),
    ])
}

fn map_prefix(map: &Map) -> String {
    join_prefix(&[
        map.comment.as_deref().map(comment_part),
        map.ktype().map(str::to_string),
        map.vtype.clone(),
    ])
}

fn table_prefix(table: &Table) -> String {
    join_prefix(&[
        table.comment.as_deref().map(comment_part),
        table.ttype().map(str::to_string),
    ])
}

fn comment_part(comment: &str) -> String {
    format!("#<{}>", text::escape(comment))
}

fn join_prefix(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true when every value is a scalar short enough for an inline
/// list.
fn are_short<'a>(values: impl Iterator<Item = &'a Value>) -> bool {
    let mut values = values;
    values.all(|value| match value {
        Value::Str(s) => s.chars().count() <= MAX_SHORT_LEN,
        Value::Bytes(b) => b.len() <= MAX_SHORT_LEN,
        Value::List(_) | Value::Map(_) | Value::Table(_) => false,
        _ => true,
    })
}
