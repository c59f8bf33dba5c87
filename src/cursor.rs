//! Dot-notation navigation and mutation.
//!
//! Keys like `server.host` or `items.0.name` are split on `.` and walked
//! segment by segment: object segments are member lookups, array segments
//! must be non-negative decimal indices. Consecutive dots collapse: empty
//! segments are skipped.
//!
//! `set_path` auto-vivifies: missing intermediate object members are created
//! as empty objects, and an array index past the end pads the array with
//! `null` slots. An intermediate `null` slot is promoted to an empty object
//! so the walk can continue.

use crate::error::Error;
use crate::value::JsonValue;

/// Look up a nested value. `None` when any segment fails to resolve.
pub fn get_path<'a>(root: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    let mut current = root;
    for segment in key.split('.').filter(|s| !s.is_empty()) {
        match current {
            JsonValue::Object(members) => {
                current = members.get(segment)?;
            }
            JsonValue::Array(items) => {
                let index = parse_index(segment)?;
                current = items.get(index)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Set a nested value, interpreting `value_str` per [`coerce_value`].
pub fn set_path(root: &mut JsonValue, key: &str, value_str: &str) -> Result<(), Error> {
    set_path_value(root, key, coerce_value(value_str))
}

/// Set a nested value to an already-built tree.
pub fn set_path_value(
    root: &mut JsonValue,
    key: &str,
    new_value: JsonValue,
) -> Result<(), Error> {
    let segments: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, intermediate)) = segments.split_last() else {
        return Err(Error::bad_input(format!("empty key '{key}'")));
    };

    let mut current = root;
    for segment in intermediate {
        current = descend(current, segment, key)?;
    }

    match current {
        JsonValue::Object(members) => {
            // Replaces any existing value; first-insertion position is kept.
            members.insert((*last).to_string(), new_value);
            Ok(())
        }
        JsonValue::Array(items) => {
            let index = parse_index(last).ok_or_else(|| {
                Error::bad_input(format!("invalid array index '{last}' in key '{key}'"))
            })?;
            if index >= items.len() {
                items.resize(index + 1, JsonValue::Null);
            }
            items[index] = new_value;
            Ok(())
        }
        other => Err(Error::bad_input(format!(
            "cannot set '{last}' on a {} in key '{key}'",
            other.type_name()
        ))),
    }
}

/// Walk one intermediate segment, creating structure as needed.
fn descend<'a>(
    current: &'a mut JsonValue,
    segment: &str,
    key: &str,
) -> Result<&'a mut JsonValue, Error> {
    match current {
        JsonValue::Object(members) => Ok(members
            .entry(segment.to_string())
            .or_insert_with(JsonValue::object)),
        JsonValue::Array(items) => {
            let index = parse_index(segment).ok_or_else(|| {
                Error::bad_input(format!("invalid array index '{segment}' in key '{key}'"))
            })?;
            if index >= items.len() {
                items.resize(index + 1, JsonValue::Null);
            }
            let slot = &mut items[index];
            if slot.is_null() {
                *slot = JsonValue::object();
            }
            match slot {
                JsonValue::Object(_) | JsonValue::Array(_) => Ok(slot),
                other => Err(Error::bad_input(format!(
                    "cannot traverse a {} at '{segment}' in key '{key}'",
                    other.type_name()
                ))),
            }
        }
        other => Err(Error::bad_input(format!(
            "cannot traverse a {} at '{segment}' in key '{key}'",
            other.type_name()
        ))),
    }
}

/// Parse a segment as a non-negative decimal array index.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Interpret a command-line value string as a JSON value.
///
/// Exact `true`/`false`/`null` become the corresponding scalars. Otherwise
/// the string becomes a number iff the *entire* non-empty string parses as a
/// finite double (leading `+` allowed, trailing garbage and embedded
/// whitespace rejected). Everything else, including the empty string, stays
/// a string. Non-finite spellings (`inf`, `nan`) stay strings: serializing
/// them would not be JSON.
pub fn coerce_value(value_str: &str) -> JsonValue {
    match value_str {
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        "null" => return JsonValue::Null,
        "" => return JsonValue::string(""),
        _ => {}
    }

    match value_str.parse::<f64>() {
        Ok(n) if n.is_finite() => JsonValue::Number(n),
        _ => JsonValue::string(value_str),
    }
}
