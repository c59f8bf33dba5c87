//! Document load and save.
//!
//! Loading keeps two deliberate legacy behaviors: an empty file loads as an
//! empty object, and a file whose contents fail to parse *also* loads as an
//! empty object (after a stderr diagnostic). Scripts in the field depend on
//! `get`/`set` working against half-provisioned configs, so both stay.
//!
//! Saving always goes through a sibling temporary file: serialize, write,
//! flush, then rename over the destination. A reader never observes a
//! truncated document, and concurrent writers settle by last-rename-wins.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Error;
use crate::parse::{parse, MAX_DOCUMENT_BYTES};
use crate::serialize::{serialize, Style};
use crate::value::JsonValue;

/// Load a JSON document from a file.
///
/// I/O failures (missing file, unreadable file) are errors; malformed
/// content degrades to an empty object as described in the module docs.
pub fn load_document(path: &Path) -> Result<JsonValue, Error> {
    let bytes = fs::read(path)?;

    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(Error::bad_input(format!(
            "file '{}' is too large (over {} bytes)",
            path.display(),
            MAX_DOCUMENT_BYTES
        )));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        eprintln!("warning: file '{}' is empty", path.display());
        return Ok(JsonValue::object());
    }

    match parse(&bytes) {
        Ok(parsed) => {
            if parsed.trailing {
                eprintln!(
                    "warning: extra characters after JSON data in '{}'",
                    path.display()
                );
            }
            Ok(parsed.value)
        }
        Err(err) => {
            eprintln!("error: failed to parse JSON in '{}': {err}", path.display());
            Ok(JsonValue::object())
        }
    }
}

/// Save a document atomically in canonical form (pretty, sorted keys,
/// trailing newline).
///
/// The document is written to a randomly-named temporary file beside the
/// destination and renamed into place. If the rename fails across devices
/// the contents are stream-copied instead; on any failure the temporary is
/// removed and the destination is left untouched.
pub fn save_document(path: &Path, doc: &JsonValue) -> Result<(), Error> {
    let mut text = serialize(doc, Style::Pretty)?;
    text.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(text.as_bytes())?;
    temp.flush()?;

    match temp.persist(path) {
        Ok(_) => Ok(()),
        Err(persist_err) => {
            // Rename can fail when the destination sits on another device
            // (EXDEV); stream-copy instead. The temp unlinks itself on drop
            // either way, so the destination is never left truncated by a
            // failed write to the temp.
            let temp = persist_err.file;
            if fs::copy(temp.path(), path).is_err() {
                return Err(Error::Io(persist_err.error));
            }
            temp.close()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut doc = JsonValue::object();
        cursor::set_path(&mut doc, "server.host", "cam1").unwrap();
        cursor::set_path(&mut doc, "server.port", "8080").unwrap();
        save_document(&path, &doc).unwrap();

        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn saved_files_are_canonical_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let doc = crate::parse(br#"{"b": 1, "a": 2}"#).unwrap().value;
        save_document(&path, &doc).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 2,\n  \"b\": 1\n}\n");
    }

    #[test]
    fn empty_file_loads_as_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();
        assert_eq!(load_document(&path).unwrap(), JsonValue::object());

        fs::write(&path, "  \n\t").unwrap();
        assert_eq!(load_document(&path).unwrap(), JsonValue::object());
    }

    #[test]
    fn unparseable_file_loads_as_empty_object() {
        // Legacy permissive behavior, kept on purpose.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_document(&path).unwrap(), JsonValue::object());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_document(&path), Err(Error::Io(_))));
    }

    #[test]
    fn save_replaces_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "old contents").unwrap();

        save_document(&path, &JsonValue::object()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");

        // No stray temp files left behind.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
