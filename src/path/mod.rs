//! Goessner-style JSONPath queries over a [`JsonValue`] tree.
//!
//! # Supported syntax
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `$` | Document root (required first token) |
//! | `.name` | Child of an object by identifier |
//! | `['name']`, `["name"]` | Child by quoted name |
//! | `['a','b']` | Union of quoted names |
//! | `[0]`, `[0,2]` | Array index or index union |
//! | `[1:4]`, `[1:4:2]` | Array slice (end defaults to length, step to 1) |
//! | `.*`, `[*]` | All members of an object or elements of an array |
//! | `..name`, `..[0]`, `..*` | Recursive descent, then the selector |
//! | `[?(@.price < 10)]` | Filter array elements by expression |
//!
//! Filter expressions support `@` continuations (`@.a.b`, `@['k']`, `@[0]`),
//! string/number/`true`/`false`/`null` literals, `!`, the comparators
//! `== != < <= > >=`, `&&`, `||`, and parentheses. Recursive descent is not
//! available inside filters.
//!
//! # Result modes and failure modes
//!
//! Matches carry both the value and the canonical path that reached it;
//! [`to_value`] shapes them as `values`, `paths`, or `pairs`. Evaluation is
//! *lenient* by default: a malformed expression or an evaluation problem
//! (negative index, bad slice) yields zero matches. In *strict* mode the
//! same conditions surface as [`PathError::Parse`] / [`PathError::Eval`] so
//! the CLI can exit 2 or 3 respectively.
//!
//! # Example
//!
//! ```
//! use jct::parse;
//! use jct::path::{evaluate, Mode, Options, to_value};
//!
//! let doc = parse(br#"{"book": [{"price": 8}, {"price": 12}]}"#).unwrap().value;
//! let matches = evaluate(&doc, "$.book[?(@.price < 10)].price", &Options::default()).unwrap();
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].path, "$.book[0].price");
//! assert_eq!(matches[0].value.as_f64(), Some(8.0));
//!
//! let shaped = to_value(&matches, Mode::Paths);
//! assert_eq!(shaped.get_index(0).unwrap().as_str(), Some("$.book[0].price"));
//! ```

mod eval;
mod expr;
mod parser;

pub use eval::EvalError;
pub use expr::{CompareOp, FilterExpr, Operand, PathStep, Selector, Step};
pub use parser::{parse_expression, ParseError};

use crate::value::JsonValue;

/// How matches are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Deep-cloned matching values.
    #[default]
    Values,
    /// Canonical path strings.
    Paths,
    /// Objects pairing each path with its value.
    Pairs,
}

/// Evaluation options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Truncate to the first N matches after all selectors apply.
    pub limit: Option<usize>,
    /// Surface parse/eval errors instead of returning zero matches.
    pub strict: bool,
}

/// One query match.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Canonical path, e.g. `$.store.book[0].title` or `$['with space']`.
    pub path: String,
    /// Deep clone of the matched node.
    pub value: JsonValue,
}

/// A strict-mode failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    Parse(ParseError),
    Eval(EvalError),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::Parse(e) => e.fmt(f),
            PathError::Eval(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PathError {}

impl From<ParseError> for PathError {
    fn from(e: ParseError) -> Self {
        PathError::Parse(e)
    }
}

impl From<EvalError> for PathError {
    fn from(e: EvalError) -> Self {
        PathError::Eval(e)
    }
}

/// Evaluate `expression` against `root`.
///
/// Lenient mode (the default) maps every failure to an empty match list;
/// strict mode returns the error. Matches are in document order and are not
/// deduplicated.
pub fn evaluate(
    root: &JsonValue,
    expression: &str,
    options: &Options,
) -> Result<Vec<Match>, PathError> {
    let outcome = evaluate_inner(root, expression, options);
    match outcome {
        Ok(matches) => Ok(matches),
        Err(err) if options.strict => Err(err),
        Err(_) => Ok(Vec::new()),
    }
}

fn evaluate_inner(
    root: &JsonValue,
    expression: &str,
    options: &Options,
) -> Result<Vec<Match>, PathError> {
    let steps = parser::parse_expression(expression)?;
    let mut nodes = eval::evaluate_steps(root, &steps, options.strict)?;

    if let Some(limit) = options.limit {
        nodes.truncate(limit);
    }

    Ok(nodes
        .into_iter()
        .map(|node| Match {
            path: node.path,
            value: node.value.clone(),
        })
        .collect())
}

/// Shape matches as a JSON array per the requested mode.
pub fn to_value(matches: &[Match], mode: Mode) -> JsonValue {
    let items = matches
        .iter()
        .map(|m| match mode {
            Mode::Values => m.value.clone(),
            Mode::Paths => JsonValue::string(m.path.clone()),
            Mode::Pairs => {
                let mut pair = indexmap::IndexMap::new();
                pair.insert("path".to_string(), JsonValue::string(m.path.clone()));
                pair.insert("value".to_string(), m.value.clone());
                JsonValue::Object(pair)
            }
        })
        .collect();
    JsonValue::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn doc(text: &str) -> JsonValue {
        parse(text.as_bytes()).unwrap().value
    }

    #[test]
    fn lenient_swallows_parse_errors() {
        let root = doc(r#"{"a": 1}"#);
        let matches = evaluate(&root, "not a path", &Options::default()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn strict_surfaces_parse_and_eval_errors_distinctly() {
        let root = doc(r#"{"a": [1]}"#);
        let strict = Options {
            strict: true,
            ..Options::default()
        };

        assert!(matches!(
            evaluate(&root, "not a path", &strict),
            Err(PathError::Parse(_))
        ));
        assert!(matches!(
            evaluate(&root, "$.a[-1]", &strict),
            Err(PathError::Eval(_))
        ));
    }

    #[test]
    fn limit_truncates_matches() {
        let root = doc("[0, 1, 2, 3]");
        let options = Options {
            limit: Some(2),
            ..Options::default()
        };
        let matches = evaluate(&root, "$[*]", &options).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].path, "$[1]");
    }

    #[test]
    fn modes_shape_output() {
        let root = doc(r#"{"a": [true, false]}"#);
        let matches = evaluate(&root, "$.a[*]", &Options::default()).unwrap();

        let values = to_value(&matches, Mode::Values);
        assert_eq!(values, doc("[true, false]"));

        let paths = to_value(&matches, Mode::Paths);
        assert_eq!(paths, doc(r#"["$.a[0]", "$.a[1]"]"#));

        let pairs = to_value(&matches, Mode::Pairs);
        assert_eq!(
            pairs,
            doc(r#"[{"path": "$.a[0]", "value": true}, {"path": "$.a[1]", "value": false}]"#)
        );
    }

    #[test]
    fn matches_are_deep_clones() {
        let root = doc(r#"{"a": {"b": 1}}"#);
        let matches = evaluate(&root, "$.a", &Options::default()).unwrap();
        assert_eq!(matches[0].value, doc(r#"{"b": 1}"#));
    }
}
