//! jct CLI: read, query, and modify JSON configuration files.

mod config_runner;
mod path_runner;
mod restore_runner;

use clap::{Parser, Subcommand};

use jct::resolve;

/// Process exit codes shared by every verb. The restore verb has its own
/// table in [`restore_runner`].
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Generic operation failure: I/O, bad key, invalid input.
    pub const FAILURE: i32 = 1;
    /// Short name unresolved, explicit path required, or JSONPath parse
    /// error in strict mode.
    pub const NOT_FOUND: i32 = 2;
    /// JSONPath evaluation error in strict mode.
    pub const EVAL_ERROR: i32 = 3;
    /// A resolver candidate exists but is unreadable.
    pub const PERMISSION_DENIED: i32 = 13;
}

#[derive(Debug, Parser)]
#[command(name = "jct")]
#[command(about = "JSON configuration tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Trace short-name resolution steps on stderr
    #[arg(long, global = true)]
    trace_resolve: bool,

    /// Config file: an explicit path (contains a separator or ends with
    /// .json) or a short name searched as ./NAME, ./NAME.json, /etc/NAME.json
    target: String,

    #[command(subcommand)]
    verb: Verb,
}

#[derive(Debug, Subcommand)]
enum Verb {
    /// Print a value by dot-notation key (e.g. server.host, items.0)
    Get { key: String },
    /// Set a value by dot-notation key; the value is coerced to
    /// true/false/null/number when it parses as one
    Set { key: String, value: String },
    /// Create a new empty config file (explicit path only)
    Create,
    /// Pretty-print the entire document
    Print,
    /// Deep-merge another JSON document into this one
    Import { source: String },
    /// Remove the OverlayFS copy so the ROM original shows through
    Restore,
    /// Query the document with a JSONPath expression
    Path(path_runner::PathArgs),
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let trace = cli.trace_resolve;
    let target = cli.target.as_str();

    // Resolver policy depends on the verb: read verbs (and restore) demand
    // an existing file, `set`/`import` allow creation through an explicit
    // path, and `create` never searches at all.
    let file = match &cli.verb {
        Verb::Get { .. } | Verb::Print | Verb::Restore | Verb::Path(_) => {
            match resolve::resolve(target, trace) {
                Ok(path) => path,
                Err(err) => return report_resolve_failure(err),
            }
        }
        Verb::Set { .. } | Verb::Import { .. } => {
            if resolve::is_explicit(target) {
                // Explicit paths may name a file that does not exist yet.
                std::path::PathBuf::from(target)
            } else {
                match resolve::resolve(target, trace) {
                    Ok(path) => path,
                    Err(err) => {
                        let code = report_resolve_failure(err);
                        if code == exit_codes::NOT_FOUND {
                            eprintln!(
                                "jct: to create a new file, supply an explicit path \
                                 (e.g., ./{target}.json)"
                            );
                        }
                        return code;
                    }
                }
            }
        }
        Verb::Create => {
            if !resolve::is_explicit(target) {
                eprintln!(
                    "jct: 'create' requires an explicit path; to create a new file, \
                     supply an explicit path (e.g., ./{target}.json)"
                );
                return exit_codes::NOT_FOUND;
            }
            std::path::PathBuf::from(target)
        }
    };

    let outcome = match cli.verb {
        Verb::Get { key } => config_runner::run_get(&file, &key),
        Verb::Set { key, value } => config_runner::run_set(&file, &key, &value),
        Verb::Create => config_runner::run_create(&file),
        Verb::Print => config_runner::run_print(&file),
        Verb::Import { source } => config_runner::run_import(&file, &source, trace),
        Verb::Restore => restore_runner::run_restore(&file),
        Verb::Path(args) => path_runner::run_path(&file, args),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("jct: {err:#}");
            exit_codes::FAILURE
        }
    }
}

/// Print the resolver's diagnostic and map the failure to an exit code.
fn report_resolve_failure(err: jct::Error) -> i32 {
    match err {
        jct::Error::PermissionDenied(path) => {
            eprintln!("jct: permission denied: {path}");
            exit_codes::PERMISSION_DENIED
        }
        jct::Error::NotFound(message) => {
            eprintln!("jct: {message}");
            exit_codes::NOT_FOUND
        }
        other => {
            eprintln!("jct: {other}");
            exit_codes::FAILURE
        }
    }
}
