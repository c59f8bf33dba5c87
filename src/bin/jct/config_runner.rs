//! Handlers for the get/set/create/print/import verbs.

use std::path::Path;

use anyhow::Result;

use jct::{cursor, merge, resolve, serialize, store, Error, JsonValue, Style};

use crate::exit_codes;

/// Print a value the way `get` reports it: scalars raw on one line,
/// containers as pretty JSON.
fn print_item(value: &JsonValue) -> Result<()> {
    match value {
        JsonValue::Null => println!("null"),
        JsonValue::Bool(b) => println!("{b}"),
        JsonValue::Number(_) => {
            // Reuse the serializer's integer/general formatting.
            println!("{}", serialize(value, Style::Compact)?);
        }
        JsonValue::String(s) => println!("{s}"),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            println!("{}", serialize(value, Style::Pretty)?);
        }
    }
    Ok(())
}

pub fn run_get(file: &Path, key: &str) -> Result<i32> {
    let doc = match store::load_document(file) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Error: failed to load config file '{}': {err}", file.display());
            return Ok(exit_codes::FAILURE);
        }
    };

    match cursor::get_path(&doc, key) {
        Some(value) => {
            print_item(value)?;
            Ok(exit_codes::SUCCESS)
        }
        None => {
            eprintln!("Error: key '{key}' not found in config file");
            Ok(exit_codes::FAILURE)
        }
    }
}

pub fn run_set(file: &Path, key: &str, value: &str) -> Result<i32> {
    // A missing file starts from an empty document; the resolver has
    // already restricted that case to explicit paths.
    let mut doc = match store::load_document(file) {
        Ok(doc) => doc,
        Err(Error::Io(_)) => JsonValue::object(),
        Err(err) => {
            eprintln!("Error: failed to load config file '{}': {err}", file.display());
            return Ok(exit_codes::FAILURE);
        }
    };

    if let Err(err) = cursor::set_path(&mut doc, key, value) {
        eprintln!("Error: failed to set key '{key}': {err}");
        return Ok(exit_codes::FAILURE);
    }

    if let Err(err) = store::save_document(file, &doc) {
        eprintln!("Error: failed to save config file '{}': {err}", file.display());
        return Ok(exit_codes::FAILURE);
    }

    // Silent success.
    Ok(exit_codes::SUCCESS)
}

pub fn run_create(file: &Path) -> Result<i32> {
    if file.exists() {
        eprintln!("Error: config file '{}' already exists", file.display());
        return Ok(exit_codes::FAILURE);
    }

    if let Err(err) = store::save_document(file, &JsonValue::object()) {
        eprintln!("Error: failed to save config file '{}': {err}", file.display());
        return Ok(exit_codes::FAILURE);
    }
    Ok(exit_codes::SUCCESS)
}

pub fn run_print(file: &Path) -> Result<i32> {
    let doc = match store::load_document(file) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Error: failed to load config file '{}': {err}", file.display());
            return Ok(exit_codes::FAILURE);
        }
    };

    print_item(&doc)?;
    Ok(exit_codes::SUCCESS)
}

pub fn run_import(file: &Path, source: &str, trace: bool) -> Result<i32> {
    // The source must name an existing document; short names resolve.
    let source_path = match resolve::resolve(source, trace) {
        Ok(path) => path,
        Err(err) => {
            return Ok(crate::report_resolve_failure(err));
        }
    };

    let source_doc = match store::load_document(&source_path) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!(
                "Error: failed to load import source '{}': {err}",
                source_path.display()
            );
            return Ok(exit_codes::FAILURE);
        }
    };

    let mut doc = match store::load_document(file) {
        Ok(doc) => doc,
        Err(Error::Io(_)) => JsonValue::object(),
        Err(err) => {
            eprintln!("Error: failed to load config file '{}': {err}", file.display());
            return Ok(exit_codes::FAILURE);
        }
    };

    merge::merge_value(&mut doc, &source_doc);

    if let Err(err) = store::save_document(file, &doc) {
        eprintln!("Error: failed to save config file '{}': {err}", file.display());
        return Ok(exit_codes::FAILURE);
    }
    Ok(exit_codes::SUCCESS)
}
