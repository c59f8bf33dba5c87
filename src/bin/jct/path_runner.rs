//! Handler for the `path` verb (JSONPath queries).

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};

use jct::path::{evaluate, to_value, Mode, Options, PathError};
use jct::{serialize, store, Style};

use crate::exit_codes;

#[derive(Debug, Args)]
pub struct PathArgs {
    /// JSONPath expression, e.g. '$..author' or '$.store.book[?(@.price < 10)].title'
    pub expr: String,

    /// Result shape
    #[arg(long, value_enum, default_value = "values")]
    pub mode: ModeArg,

    /// Keep only the first N matches
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Surface expression errors as exit codes (2 parse, 3 eval) instead of
    /// an empty result
    #[arg(long)]
    pub strict: bool,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,

    /// With a single match in values mode, print the value bare instead of
    /// wrapped in a one-element array
    #[arg(long)]
    pub unwrap_single: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Matched values
    Values,
    /// Canonical path strings
    Paths,
    /// Objects pairing each path with its value
    Pairs,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Values => Mode::Values,
            ModeArg::Paths => Mode::Paths,
            ModeArg::Pairs => Mode::Pairs,
        }
    }
}

pub fn run_path(file: &Path, args: PathArgs) -> Result<i32> {
    let doc = match store::load_document(file) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Error: failed to load config file '{}': {err}", file.display());
            return Ok(if args.strict {
                exit_codes::EVAL_ERROR
            } else {
                exit_codes::SUCCESS
            });
        }
    };

    let options = Options {
        limit: args.limit,
        strict: args.strict,
    };

    let matches = match evaluate(&doc, &args.expr, &options) {
        Ok(matches) => matches,
        Err(err @ PathError::Parse(_)) => {
            eprintln!("jct: {err}");
            return Ok(exit_codes::NOT_FOUND);
        }
        Err(err @ PathError::Eval(_)) => {
            eprintln!("jct: {err}");
            return Ok(exit_codes::EVAL_ERROR);
        }
    };

    let style = if args.pretty {
        Style::Pretty
    } else {
        Style::Compact
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mode = Mode::from(args.mode);
    if args.unwrap_single && mode == Mode::Values && matches.len() == 1 {
        writeln!(out, "{}", serialize(&matches[0].value, style)?)?;
    } else {
        let shaped = to_value(&matches, mode);
        writeln!(out, "{}", serialize(&shaped, style)?)?;
    }
    out.flush()?;

    Ok(exit_codes::SUCCESS)
}
