//! JSONPath evaluator.
//!
//! Evaluation maintains a working set of node references, each carrying the
//! canonical path string that reached it. Every step transforms the set;
//! results come back in document order and are never deduplicated.

use crate::value::JsonValue;
use crate::MAX_DEPTH;

use super::expr::{FilterExpr, Operand, PathStep, Selector, Step};

/// Error that occurs during evaluation (strict mode only; lenient mode
/// skips the offending node instead).
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jsonpath evaluation error: {}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// A working-set entry: a node and the canonical path that reached it.
pub(super) struct NodeRef<'a> {
    pub value: &'a JsonValue,
    pub path: String,
}

static NULL: JsonValue = JsonValue::Null;

/// Apply all steps to the document root.
pub(super) fn evaluate_steps<'a>(
    root: &'a JsonValue,
    steps: &[Step],
    strict: bool,
) -> Result<Vec<NodeRef<'a>>, EvalError> {
    let mut current = vec![NodeRef {
        value: root,
        path: "$".to_string(),
    }];

    for step in steps {
        let input = if step.recursive {
            let mut descendants = Vec::new();
            for node in &current {
                collect_descendants(node.value, &node.path, &mut descendants, 0)?;
            }
            descendants
        } else {
            current
        };

        current = apply_selector(&input, &step.selector, strict)?;
    }

    Ok(current)
}

/// Collect all descendants in document order: each child is pushed before
/// its own children are visited.
fn collect_descendants<'a>(
    value: &'a JsonValue,
    path: &str,
    out: &mut Vec<NodeRef<'a>>,
    depth: usize,
) -> Result<(), EvalError> {
    if depth > MAX_DEPTH {
        return Err(EvalError::new("structure too deep"));
    }

    match value {
        JsonValue::Object(members) => {
            for (key, child) in members {
                let child_path = append_member(path, key);
                out.push(NodeRef {
                    value: child,
                    path: child_path.clone(),
                });
                collect_descendants(child, &child_path, out, depth + 1)?;
            }
        }
        JsonValue::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_path = append_index(path, index);
                out.push(NodeRef {
                    value: child,
                    path: child_path.clone(),
                });
                collect_descendants(child, &child_path, out, depth + 1)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn apply_selector<'a>(
    input: &[NodeRef<'a>],
    selector: &Selector,
    strict: bool,
) -> Result<Vec<NodeRef<'a>>, EvalError> {
    let mut next = Vec::new();

    for node in input {
        match selector {
            Selector::Member(name) => {
                if let Some(child) = node.value.get_member(name) {
                    next.push(NodeRef {
                        value: child,
                        path: append_member(&node.path, name),
                    });
                }
            }
            Selector::MemberUnion(names) => {
                for name in names {
                    if let Some(child) = node.value.get_member(name) {
                        next.push(NodeRef {
                            value: child,
                            path: append_member(&node.path, name),
                        });
                    }
                }
            }
            Selector::Wildcard => match node.value {
                JsonValue::Object(members) => {
                    for (key, child) in members {
                        next.push(NodeRef {
                            value: child,
                            path: append_member(&node.path, key),
                        });
                    }
                }
                JsonValue::Array(items) => {
                    for (index, child) in items.iter().enumerate() {
                        next.push(NodeRef {
                            value: child,
                            path: append_index(&node.path, index),
                        });
                    }
                }
                _ => {}
            },
            Selector::IndexUnion(indices) => {
                let Some(items) = node.value.as_array() else {
                    continue;
                };
                for &index in indices {
                    if index < 0 {
                        if strict {
                            return Err(EvalError::new("negative indices not supported"));
                        }
                        continue;
                    }
                    let index = index as usize;
                    if let Some(child) = items.get(index) {
                        next.push(NodeRef {
                            value: child,
                            path: append_index(&node.path, index),
                        });
                    }
                }
            }
            Selector::Slice { start, end, step } => {
                let Some(items) = node.value.as_array() else {
                    continue;
                };
                if *start < 0 || end.map_or(false, |e| e < 0) {
                    if strict {
                        return Err(EvalError::new("negative slice bounds not supported"));
                    }
                    continue;
                }
                let len = items.len();
                let from = (*start as usize).min(len);
                let to = end.map_or(len, |e| (e as usize).min(len));
                let stride = if *step <= 0 { 1 } else { *step as usize };

                let mut index = from;
                while index < to {
                    next.push(NodeRef {
                        value: &items[index],
                        path: append_index(&node.path, index),
                    });
                    index += stride;
                }
            }
            Selector::Filter(expr) => match node.value {
                JsonValue::Array(items) => {
                    for (index, child) in items.iter().enumerate() {
                        if eval_filter(expr, child) {
                            next.push(NodeRef {
                                value: child,
                                path: append_index(&node.path, index),
                            });
                        }
                    }
                }
                other => {
                    // A non-array node is tested as a whole and kept in
                    // place when the expression holds.
                    if eval_filter(expr, other) {
                        next.push(NodeRef {
                            value: other,
                            path: node.path.clone(),
                        });
                    }
                }
            },
        }
    }

    Ok(next)
}

// ---- canonical path strings ----

fn is_identifier_safe(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn append_member(base: &str, name: &str) -> String {
    if is_identifier_safe(name) {
        format!("{base}.{name}")
    } else {
        format!("{base}['{name}']")
    }
}

fn append_index(base: &str, index: usize) -> String {
    format!("{base}[{index}]")
}

// ---- filter evaluation ----

fn eval_filter(expr: &FilterExpr, current: &JsonValue) -> bool {
    match expr {
        FilterExpr::Or(left, right) => {
            eval_filter(left, current) || eval_filter(right, current)
        }
        FilterExpr::And(left, right) => {
            eval_filter(left, current) && eval_filter(right, current)
        }
        FilterExpr::Not(inner) => !eval_filter(inner, current),
        FilterExpr::Truthy(operand) => resolve(operand, current).is_truthy(),
        FilterExpr::Compare { op, left, right } => {
            compare(*op, resolve(left, current), resolve(right, current))
        }
    }
}

/// Resolve an operand against the current item. A path that runs off the
/// document resolves to `null`.
fn resolve<'a>(operand: &'a Operand, current: &'a JsonValue) -> &'a JsonValue {
    match operand {
        Operand::Literal(value) => value,
        Operand::Current(steps) => {
            let mut value = current;
            for step in steps {
                let next = match step {
                    PathStep::Member(name) => value.get_member(name),
                    PathStep::Index(index) => {
                        usize::try_from(*index).ok().and_then(|i| value.get_index(i))
                    }
                };
                match next {
                    Some(v) => value = v,
                    None => return &NULL,
                }
            }
            value
        }
    }
}

/// Type-aware comparison. Same-type operands compare naturally; `null`
/// against anything is only meaningful for equality; any other cross-type
/// comparison is false, except `!=` which is true.
fn compare(op: super::expr::CompareOp, a: &JsonValue, b: &JsonValue) -> bool {
    use super::expr::CompareOp;

    let ordering = match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.partial_cmp(y),
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.as_bytes().cmp(y.as_bytes())),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        (JsonValue::Null, _) | (_, JsonValue::Null) => {
            let same = matches!((a, b), (JsonValue::Null, JsonValue::Null));
            return match op {
                CompareOp::Eq => same,
                CompareOp::Ne => !same,
                _ => false,
            };
        }
        _ => None,
    };

    match ordering {
        Some(ordering) => op.holds(ordering),
        // Cross-type (non-null): nothing is equal, everything is unequal.
        None => op == CompareOp::Ne,
    }
}
