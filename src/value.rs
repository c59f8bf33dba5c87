//! The JSON document model.
//!
//! [`JsonValue`] is the tree every other module operates on. Strings hold
//! *decoded* bytes: a `\n` in source text lives here as a single newline
//! byte. The codec is responsible for escaping on the way out and unescaping
//! on the way in; nothing else may touch escape sequences, or saved files
//! drift (backslashes double on every save cycle).
//!
//! Object members keep insertion order in memory and are sorted by key only
//! at serialization time. Inserting an existing key replaces the prior value
//! in place, so duplicate keys cannot exist.

use indexmap::IndexMap;

/// An owned JSON value.
#[derive(Debug, Clone)]
pub enum JsonValue {
    /// JSON null
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number (IEEE-754 double; integral values reprint as integers)
    Number(f64),
    /// JSON string (decoded, no escape sequences)
    String(String),
    /// JSON array
    Array(Vec<JsonValue>),
    /// JSON object (insertion-ordered in memory, sorted on output)
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    /// Create an empty object.
    pub fn object() -> Self {
        JsonValue::Object(IndexMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        JsonValue::Array(Vec::new())
    }

    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        JsonValue::String(s.into())
    }

    /// Create a number value.
    pub fn number(n: f64) -> Self {
        JsonValue::Number(n)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Check if this value is "truthy": not null and not `false`.
    ///
    /// This is the notion the JSONPath filter sub-language uses for bare
    /// terms; `0`, `""`, `[]`, and `{}` are all truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, JsonValue::Null | JsonValue::Bool(false))
    }

    /// Get the type name of this value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    /// Convert to a boolean, if possible.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to an f64, if possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert to a string reference, if possible.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to an array reference, if possible.
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert to a mutable array reference, if possible.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert to an object reference, if possible.
    pub fn as_object(&self) -> Option<&IndexMap<String, JsonValue>> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Convert to a mutable object reference, if possible.
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, JsonValue>> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Member lookup on objects; `None` for non-objects and missing keys.
    pub fn get_member(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Element lookup on arrays; `None` for non-arrays and out-of-range
    /// indices.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Number of array elements, or 0 for non-arrays.
    pub fn array_len(&self) -> usize {
        self.as_array().map_or(0, Vec::len)
    }

    /// Structural equality.
    ///
    /// Types must match; numbers compare as double values, strings by bytes,
    /// arrays element-wise, objects by key set with structurally equal
    /// values. Parsing never produces NaN, so reflexivity holds for every
    /// tree the codec can build.
    pub fn structural_eq(&self, other: &JsonValue) -> bool {
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Number(a), JsonValue::Number(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (JsonValue::Object(a), JsonValue::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.get(k).map_or(false, |other_v| v.structural_eq(other_v))
                    })
            }
            _ => false,
        }
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}
