//! Diagnostic parse-trace frames.
//!
//! A [`ParseTrace`] frame represents "the record currently being parsed
//! under this type". The materializer owns one frame per nesting level and
//! threads it through the recursion as an explicit parameter; child frames
//! borrow their parent, so the whole chain lives on the call stack and is
//! discarded as the recursion unwinds. The chain exists purely so that a
//! failure deep inside a nested structure can be reported with the full
//! path from the root schema type down to the offending field.

use std::fmt;

use serde_json::Value;

/// One frame of the diagnostic chain.
#[derive(Debug)]
pub struct ParseTrace<'a> {
    type_label: String,
    field_name: Option<String>,
    field_type: Option<String>,
    value: Option<&'a Value>,
    parent: Option<&'a ParseTrace<'a>>,
}

impl<'a> ParseTrace<'a> {
    /// Creates a root frame, labelled with the content type being parsed.
    pub fn new(type_label: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
            field_name: None,
            field_type: None,
            value: None,
            parent: None,
        }
    }

    /// Creates a frame one nesting level below `parent`.
    pub fn nested(type_label: impl Into<String>, parent: &'a ParseTrace<'a>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(type_label)
        }
    }

    /// Records the field currently being parsed under this frame. Called
    /// repeatedly as the parser moves across the record's fields; each call
    /// replaces the previous slot.
    pub fn record(&mut self, field_name: &str, field_type: &str, value: &'a Value) {
        self.field_name = Some(field_name.to_string());
        self.field_type = Some(field_type.to_string());
        self.value = Some(value);
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    /// Renders this frame's ancestors, oldest first, as a breadcrumb.
    /// Returns `None` for a root frame.
    fn parents(&self) -> Option<String> {
        let mut chain = Vec::new();
        let mut frame = self.parent;
        while let Some(current) = frame {
            chain.push(current);
            frame = current.parent;
        }
        if chain.is_empty() {
            return None;
        }
        chain.reverse();
        let rendered: Vec<String> = chain
            .iter()
            .map(|frame| match (&frame.parent, &frame.field_type) {
                (None, _) => frame.type_label.clone(),
                (Some(_), Some(field_type)) => {
                    format!("{} ({})", frame.type_label, field_type)
                }
                (Some(_), None) => frame.type_label.clone(),
            })
            .collect();
        Some(rendered.join(" > "))
    }
}

impl fmt::Display for ParseTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parents) = self.parents() {
            writeln!(f, "Parents: {}", parents)?;
        }
        writeln!(f, "Type: {}", self.type_label)?;
        match (&self.field_name, &self.field_type) {
            (Some(name), Some(field_type)) => {
                writeln!(f, "SchemaField: {} ({})", name, field_type)?;
            }
            _ => writeln!(f, "SchemaField: (none)")?,
        }
        match self.value {
            Some(value) => writeln!(f, "Content: {}", dump(value))?,
            None => writeln!(f, "Content: (none)")?,
        }
        writeln!(f)
    }
}

/// Renders a raw value as an indented, recursive key/value dump. Scalars
/// render in their literal or quoted form; associative structures render one
/// `'key' => value,` line per entry and arrays one positional entry per line.
pub fn dump(value: &Value) -> String {
    let mut out = String::new();
    dump_into(value, 0, &mut out);
    out
}

fn dump_into(value: &Value, indent: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        Value::Array(items) => {
            out.push('[');
            for item in items {
                out.push('\n');
                push_indent(indent + 1, out);
                dump_into(item, indent + 1, out);
                out.push(',');
            }
            if !items.is_empty() {
                out.push('\n');
                push_indent(indent, out);
            }
            out.push(']');
        }
        Value::Object(entries) => {
            out.push('{');
            for (key, entry) in entries {
                out.push('\n');
                push_indent(indent + 1, out);
                out.push('\'');
                out.push_str(key);
                out.push_str("' => ");
                dump_into(entry, indent + 1, out);
                out.push(',');
            }
            if !entries.is_empty() {
                out.push('\n');
                push_indent(indent, out);
            }
            out.push('}');
        }
    }
}

fn push_indent(levels: usize, out: &mut String) {
    for _ in 0..levels {
        out.push_str("    ");
    }
}
