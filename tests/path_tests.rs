//! Integration tests for the JSONPath engine against realistic documents.

use jct::path::{evaluate, to_value, Mode, Options, PathError};
use jct::{parse, serialize, JsonValue, Style};

/// The classic bookstore document, extended with the shapes the fixture
/// tests rely on (typed scalars, nested arrays).
const BOOKS: &str = r#"{
  "store": {
    "book": [
      {
        "category": "reference",
        "author": "Nigel Rees",
        "title": "Sayings of the Century",
        "price": 8.95
      },
      {
        "category": "fiction",
        "author": "Evelyn Waugh",
        "title": "Sword of Honour",
        "price": 12.99
      },
      {
        "category": "fiction",
        "author": "Herman Melville",
        "title": "Moby Dick",
        "isbn": "0-553-21311-3",
        "price": 8.99
      },
      {
        "category": "fiction",
        "author": "J. R. R. Tolkien",
        "title": "The Lord of the Rings",
        "isbn": "0-395-19395-8",
        "price": 22.99
      }
    ],
    "bicycle": {
      "color": "red",
      "price": 19.95
    }
  }
}"#;

const FIXTURE: &str = r#"{
  "arrays": {
    "numbers": [1, 2, 3, 4, 5],
    "strings": ["alpha", "beta", "gamma"]
  },
  "booleans": {
    "true_value": true,
    "false_value": false
  },
  "nested": {
    "level1": {"level2": {"value": "deep"}}
  }
}"#;

fn doc(text: &str) -> JsonValue {
    parse(text.as_bytes()).unwrap().value
}

fn values(root: &JsonValue, expr: &str) -> Vec<JsonValue> {
    evaluate(root, expr, &Options::default())
        .unwrap()
        .into_iter()
        .map(|m| m.value)
        .collect()
}

fn strings(root: &JsonValue, expr: &str) -> Vec<String> {
    values(root, expr)
        .into_iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn recursive_descent_collects_all_authors_in_document_order() {
    let root = doc(BOOKS);
    assert_eq!(
        strings(&root, "$..author"),
        [
            "Nigel Rees",
            "Evelyn Waugh",
            "Herman Melville",
            "J. R. R. Tolkien"
        ]
    );
}

#[test]
fn filter_selects_cheap_books() {
    let root = doc(BOOKS);
    assert_eq!(
        strings(&root, "$.store.book[?(@.price < 10)].title"),
        ["Sayings of the Century", "Moby Dick"]
    );
}

#[test]
fn filter_by_string_equality() {
    let root = doc(BOOKS);
    assert_eq!(
        strings(&root, "$.store.book[?(@.category == 'fiction')].author"),
        ["Evelyn Waugh", "Herman Melville", "J. R. R. Tolkien"]
    );
}

#[test]
fn filter_on_missing_member() {
    let root = doc(BOOKS);
    // Books without an isbn member: @.isbn resolves to null -> falsy.
    assert_eq!(
        strings(&root, "$.store.book[?(!@.isbn)].title"),
        ["Sayings of the Century", "Sword of Honour"]
    );
}

#[test]
fn filter_with_boolean_connectives() {
    let root = doc(BOOKS);
    assert_eq!(
        strings(
            &root,
            "$.store.book[?(@.category == 'fiction' && @.price < 10)].title"
        ),
        ["Moby Dick"]
    );
    assert_eq!(
        strings(
            &root,
            "$.store.book[?(@.price < 9 || @.price > 20)].title"
        ),
        ["Sayings of the Century", "Moby Dick", "The Lord of the Rings"]
    );
}

#[test]
fn slice_takes_prefix() {
    let root = doc(FIXTURE);
    assert_eq!(
        values(&root, "$.arrays.numbers[0:2]"),
        [JsonValue::number(1.0), JsonValue::number(2.0)]
    );
}

#[test]
fn slice_with_step_and_open_end() {
    let root = doc(FIXTURE);
    assert_eq!(
        values(&root, "$.arrays.numbers[0::2]"),
        [
            JsonValue::number(1.0),
            JsonValue::number(3.0),
            JsonValue::number(5.0)
        ]
    );
    assert_eq!(
        values(&root, "$.arrays.numbers[3:]"),
        [JsonValue::number(4.0), JsonValue::number(5.0)]
    );
}

#[test]
fn index_union_preserves_listed_order() {
    let root = doc(FIXTURE);
    assert_eq!(
        values(&root, "$.arrays.numbers[4,0,2]"),
        [
            JsonValue::number(5.0),
            JsonValue::number(1.0),
            JsonValue::number(3.0)
        ]
    );
}

#[test]
fn name_union_selects_both_members() {
    let root = doc(FIXTURE);
    let matches = evaluate(
        &root,
        "$.booleans['true_value','false_value']",
        &Options::default(),
    )
    .unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].path, "$.booleans.true_value");
    assert_eq!(matches[0].value, JsonValue::Bool(true));
    assert_eq!(matches[1].value, JsonValue::Bool(false));
}

#[test]
fn paths_mode_renders_canonical_strings() {
    let root = doc(FIXTURE);
    let matches = evaluate(&root, "$.arrays.strings[*]", &Options::default()).unwrap();
    let shaped = to_value(&matches, Mode::Paths);
    assert_eq!(
        shaped,
        doc(r#"["$.arrays.strings[0]", "$.arrays.strings[1]", "$.arrays.strings[2]"]"#)
    );
}

#[test]
fn pairs_mode_carries_path_and_value() {
    let root = doc(FIXTURE);
    let matches = evaluate(&root, "$.nested.level1.level2.value", &Options::default()).unwrap();
    let shaped = to_value(&matches, Mode::Pairs);
    assert_eq!(
        shaped,
        doc(r#"[{"path": "$.nested.level1.level2.value", "value": "deep"}]"#)
    );
    // Canonical serialization puts `path` before `value`.
    assert_eq!(
        serialize(&shaped, Style::Compact).unwrap(),
        r#"[{"path":"$.nested.level1.level2.value","value":"deep"}]"#
    );
}

#[test]
fn wildcard_over_objects_and_deep_wildcard() {
    let root = doc(BOOKS);
    assert_eq!(values(&root, "$.store.*").len(), 2);
    // Every price in the store, books before bicycle (document order).
    let prices = values(&root, "$..price");
    assert_eq!(prices.len(), 5);
    assert_eq!(prices[4], JsonValue::number(19.95));
}

#[test]
fn recursive_descent_with_subscript() {
    let root = doc(BOOKS);
    let titles = strings(&root, "$..book[0].title");
    assert_eq!(titles, ["Sayings of the Century"]);
}

#[test]
fn limit_truncates_after_selectors() {
    let root = doc(BOOKS);
    let options = Options {
        limit: Some(2),
        ..Options::default()
    };
    let matches = evaluate(&root, "$..author", &options).unwrap();
    assert_eq!(matches.len(), 2);
}

#[test]
fn lenient_mode_turns_errors_into_empty_results() {
    let root = doc(BOOKS);
    assert!(values(&root, "garbage").is_empty());
    assert!(values(&root, "$.store.book[-1]").is_empty());
    assert!(values(&root, "$.store.book[?(").is_empty());
}

#[test]
fn strict_mode_distinguishes_parse_from_eval() {
    let root = doc(BOOKS);
    let strict = Options {
        strict: true,
        ..Options::default()
    };

    assert!(matches!(
        evaluate(&root, "$.store.book[?(", &strict),
        Err(PathError::Parse(_))
    ));
    assert!(matches!(
        evaluate(&root, "$.store.book[0:-2]", &strict),
        Err(PathError::Eval(_))
    ));
}

#[test]
fn missing_members_match_nothing() {
    let root = doc(BOOKS);
    assert!(values(&root, "$.store.magazine").is_empty());
    assert!(values(&root, "$.store.book[99]").is_empty());
}

#[test]
fn root_only_expression_returns_the_document() {
    let root = doc(FIXTURE);
    let matches = evaluate(&root, "$", &Options::default()).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].path, "$");
    assert_eq!(matches[0].value, root);
}
