//! # jct
//!
//! A small library (and CLI tool) for reading, querying, and modifying JSON
//! configuration documents. Built for resource-constrained hosts: no runtime
//! services, no background threads, every operation loads a document, works
//! on it locally, and writes it back atomically.
//!
//! ## Quick start
//!
//! ```
//! use jct::{parse, serialize, Style};
//! use jct::cursor;
//!
//! let mut doc = parse(br#"{"server": {"host": "cam1"}}"#).unwrap().value;
//! cursor::set_path(&mut doc, "server.port", "8080").unwrap();
//!
//! let port = cursor::get_path(&doc, "server.port").unwrap();
//! assert_eq!(port.as_f64(), Some(8080.0));
//!
//! // Canonical form: sorted keys, two-space indent.
//! let text = serialize(&doc, Style::Pretty).unwrap();
//! assert!(text.starts_with("{\n  \"server\""));
//! ```
//!
//! ## JSONPath
//!
//! ```
//! use jct::parse;
//! use jct::path::{evaluate, Options};
//!
//! let doc = parse(br#"{"items": [{"id": 1}, {"id": 2}]}"#).unwrap().value;
//! let results = evaluate(&doc, "$.items[*].id", &Options::default()).unwrap();
//! assert_eq!(results.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the [`JsonValue`] document model
//! - [`parse`](crate::parse()) / [`serialize`](crate::serialize()) — the text codec
//! - [`cursor`] — dot-notation (`server.host`, `items.0`) get/set
//! - [`merge`] — deep merge and structural diff
//! - [`path`] — Goessner-style JSONPath queries
//! - [`resolve`] — short-name file resolution (`prudynt` -> `/etc/prudynt.json`)
//! - [`store`] — document load/save with atomic file replacement

pub mod cursor;
pub mod error;
pub mod merge;
pub mod path;
pub mod resolve;
pub mod store;
pub mod value;

mod parse;
mod serialize;

pub use error::{Error, Result};
pub use parse::{parse, Parsed, MAX_DOCUMENT_BYTES};
pub use serialize::{serialize, Style};
pub use value::JsonValue;

/// Maximum nesting depth accepted by the parser, serializer, differ, and
/// JSONPath evaluator. Deeper structures are rejected rather than risking
/// stack exhaustion.
pub const MAX_DEPTH: usize = 1000;
