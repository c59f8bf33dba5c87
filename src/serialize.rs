//! Canonical JSON serializer.
//!
//! Output is deterministic for a given tree: object keys are emitted in
//! sorted order (lexicographic, byte-wise) regardless of insertion order.
//! Pretty mode indents two spaces per level with a space after `:`; compact
//! mode emits no whitespace at all.
//!
//! A number whose value equals its truncation to `i64` prints in integer
//! form; anything else uses Rust's shortest round-trip float formatting.
//! Strings are escaped as the exact inverse of the parser's decoding, with
//! control characters that lack a named escape emitted as `\u00xx`
//! (lowercase hex). `/` is never escaped on output.

use std::fmt::Write;

use crate::error::Error;
use crate::value::JsonValue;
use crate::MAX_DEPTH;

/// Output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No whitespace: `{"a":1,"b":[2,3]}`
    Compact,
    /// Two-space indent, newline-separated members (the on-disk form).
    Pretty,
}

/// Serialize a tree to text.
///
/// The result has no trailing newline; the [`store`](crate::store) layer
/// appends one when writing files.
pub fn serialize(value: &JsonValue, style: Style) -> Result<String, Error> {
    let mut out = String::new();
    write_value(&mut out, value, style, 0)?;
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &JsonValue,
    style: Style,
    depth: usize,
) -> Result<(), Error> {
    if depth > MAX_DEPTH {
        return Err(Error::bad_input("structure too deep"));
    }

    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Number(n) => write_number(out, *n),
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(items) => write_array(out, items, style, depth)?,
        JsonValue::Object(members) => write_object(out, members, style, depth)?,
    }
    Ok(())
}

/// Integral doubles print as integers, everything else in shortest form.
fn write_number(out: &mut String, n: f64) {
    if n == n as i64 as f64 {
        let _ = write!(out, "{}", n as i64);
    } else {
        let _ = write!(out, "{n}");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array(
    out: &mut String,
    items: &[JsonValue],
    style: Style,
    depth: usize,
) -> Result<(), Error> {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }

    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if style == Style::Pretty {
            out.push('\n');
            push_indent(out, depth + 1);
        }
        write_value(out, item, style, depth + 1)?;
    }
    if style == Style::Pretty {
        out.push('\n');
        push_indent(out, depth);
    }
    out.push(']');
    Ok(())
}

fn write_object(
    out: &mut String,
    members: &indexmap::IndexMap<String, JsonValue>,
    style: Style,
    depth: usize,
) -> Result<(), Error> {
    if members.is_empty() {
        out.push_str("{}");
        return Ok(());
    }

    let mut keys: Vec<&String> = members.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if style == Style::Pretty {
            out.push('\n');
            push_indent(out, depth + 1);
        }
        write_string(out, key);
        out.push(':');
        if style == Style::Pretty {
            out.push(' ');
        }
        write_value(out, &members[*key], style, depth + 1)?;
    }
    if style == Style::Pretty {
        out.push('\n');
        push_indent(out, depth);
    }
    out.push('}');
    Ok(())
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
