//! Deep merge and structural diff.
//!
//! `merge` drives the `import` verb: object members merge recursively,
//! anything else is replaced wholesale. `diff` produces the minimal object
//! that, merged over `original`, reproduces `modified` for every key present
//! in `modified` (removed keys are not expressed; configs only grow).

use crate::error::Error;
use crate::value::JsonValue;
use crate::MAX_DEPTH;

/// Deep-merge `src` into `dest`.
///
/// When both sides are objects, each `(key, value)` of `src` merges
/// recursively into `dest`; otherwise `dest` is replaced with a deep clone
/// of `src`. Merging into `None` yields a clone of `src`.
pub fn merge(dest: &mut Option<JsonValue>, src: &JsonValue) {
    match dest {
        None => *dest = Some(src.clone()),
        Some(d) => merge_value(d, src),
    }
}

/// Deep-merge `src` into an existing tree.
pub fn merge_value(dest: &mut JsonValue, src: &JsonValue) {
    match (&mut *dest, src) {
        (JsonValue::Object(dest_members), JsonValue::Object(src_members)) => {
            for (key, src_child) in src_members {
                match dest_members.get_mut(key) {
                    Some(dest_child)
                        if dest_child.as_object().is_some()
                            && src_child.as_object().is_some() =>
                    {
                        merge_value(dest_child, src_child);
                    }
                    _ => {
                        dest_members.insert(key.clone(), src_child.clone());
                    }
                }
            }
        }
        _ => *dest = src.clone(),
    }
}

/// Structural diff: what `modified` changes relative to `original`.
///
/// Both objects: an object holding only the keys whose values differ,
/// recursing into nested objects and dropping empty sub-diffs. Otherwise: a
/// clone of `modified` when the two differ, an empty object when equal.
pub fn diff(modified: &JsonValue, original: &JsonValue) -> Result<JsonValue, Error> {
    diff_at(modified, original, 0)
}

fn diff_at(
    modified: &JsonValue,
    original: &JsonValue,
    depth: usize,
) -> Result<JsonValue, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::bad_input("structure too deep"));
    }

    match (modified, original) {
        (JsonValue::Object(mod_members), JsonValue::Object(orig_members)) => {
            let mut out = indexmap::IndexMap::new();
            for (key, mod_child) in mod_members {
                match orig_members.get(key) {
                    None => {
                        out.insert(key.clone(), mod_child.clone());
                    }
                    Some(orig_child) => {
                        if mod_child.as_object().is_some() && orig_child.as_object().is_some()
                        {
                            let child_diff = diff_at(mod_child, orig_child, depth + 1)?;
                            let empty = child_diff
                                .as_object()
                                .map_or(false, indexmap::IndexMap::is_empty);
                            if !empty {
                                out.insert(key.clone(), child_diff);
                            }
                        } else if !mod_child.structural_eq(orig_child) {
                            out.insert(key.clone(), mod_child.clone());
                        }
                    }
                }
            }
            Ok(JsonValue::Object(out))
        }
        _ if modified.structural_eq(original) => Ok(JsonValue::object()),
        _ => Ok(modified.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn doc(text: &str) -> JsonValue {
        parse(text.as_bytes()).unwrap().value
    }

    #[test]
    fn merge_recurses_into_objects() {
        let mut dest = doc(r#"{"a": {"x": 1, "y": 2}, "b": 1}"#);
        let src = doc(r#"{"a": {"y": 20, "z": 30}, "c": 3}"#);
        merge_value(&mut dest, &src);
        assert_eq!(dest, doc(r#"{"a": {"x": 1, "y": 20, "z": 30}, "b": 1, "c": 3}"#));
    }

    #[test]
    fn merge_replaces_mismatched_shapes() {
        let mut dest = doc(r#"{"a": {"x": 1}}"#);
        let src = doc(r#"{"a": [1, 2]}"#);
        merge_value(&mut dest, &src);
        assert_eq!(dest, doc(r#"{"a": [1, 2]}"#));

        let mut scalar = doc("5");
        merge_value(&mut scalar, &doc(r#"{"a": 1}"#));
        assert_eq!(scalar, doc(r#"{"a": 1}"#));
    }

    #[test]
    fn merge_into_none_clones_source() {
        let mut dest = None;
        let src = doc(r#"{"a": 1}"#);
        merge(&mut dest, &src);
        assert_eq!(dest.unwrap(), src);
    }

    #[test]
    fn diff_reports_only_changes() {
        let original = doc(r#"{"a": {"x": 1, "y": 2}, "b": "same"}"#);
        let modified = doc(r#"{"a": {"x": 1, "y": 3}, "b": "same", "c": true}"#);
        let d = diff(&modified, &original).unwrap();
        assert_eq!(d, doc(r#"{"a": {"y": 3}, "c": true}"#));
    }

    #[test]
    fn diff_of_identical_documents_is_empty() {
        let value = doc(r#"{"a": {"b": [1, 2, 3]}}"#);
        assert_eq!(diff(&value, &value).unwrap(), JsonValue::object());
    }

    #[test]
    fn diff_of_scalars() {
        assert_eq!(diff(&doc("1"), &doc("2")).unwrap(), doc("1"));
        assert_eq!(diff(&doc("1"), &doc("1")).unwrap(), JsonValue::object());
        // Type change surfaces the modified side wholesale.
        assert_eq!(diff(&doc(r#""1""#), &doc("1")).unwrap(), doc(r#""1""#));
    }

    #[test]
    fn diff_ignores_keys_removed_from_modified() {
        let original = doc(r#"{"a": 1, "gone": 2}"#);
        let modified = doc(r#"{"a": 1}"#);
        assert_eq!(diff(&modified, &original).unwrap(), JsonValue::object());
    }

    #[test]
    fn merge_then_diff_round_trip() {
        let original = doc(r#"{"server": {"host": "a", "port": 80}}"#);
        let overlay = doc(r#"{"server": {"port": 8080}, "extra": [1]}"#);

        let mut merged = Some(original.clone());
        merge(&mut merged, &overlay);
        let merged = merged.unwrap();

        assert_eq!(diff(&merged, &original).unwrap(), overlay);
    }
}
