//! Crate-wide error type.
//!
//! Every failure the library can report maps to one of these kinds; the CLI
//! front-end translates kinds to exit codes. The path module keeps its own
//! finer-grained [`ParseError`](crate::path::ParseError) and
//! [`EvalError`](crate::path::EvalError) types and converts them here at the
//! boundary.

use std::fmt;
use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The ways an operation can fail.
#[derive(Debug)]
pub enum Error {
    /// Malformed argument: bad key syntax, non-absolute path where one is
    /// required, structure too deep, oversized input.
    BadInput(String),
    /// Missing file, missing key, or short-name resolution that found
    /// nothing.
    NotFound(String),
    /// A resolver candidate exists but is not readable.
    PermissionDenied(String),
    /// Read/write/rename/unlink failure.
    Io(io::Error),
    /// Malformed JSON text or JSONPath expression.
    Parse { message: String, position: usize },
    /// JSONPath evaluation problem (bad slice, negative index).
    Eval(String),
    /// Invariant violation; should not occur in normal operation.
    Internal(String),
}

impl Error {
    pub(crate) fn bad_input(message: impl Into<String>) -> Self {
        Error::BadInput(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadInput(msg) => write!(f, "bad input: {msg}"),
            Error::NotFound(msg) => write!(f, "not found: {msg}"),
            Error::PermissionDenied(path) => write!(f, "permission denied: {path}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse { message, position } => {
                write!(f, "parse error at byte {position}: {message}")
            }
            Error::Eval(msg) => write!(f, "evaluation error: {msg}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<crate::path::PathError> for Error {
    fn from(err: crate::path::PathError) -> Self {
        match err {
            crate::path::PathError::Parse(e) => Error::Parse {
                message: e.message,
                position: e.position,
            },
            crate::path::PathError::Eval(e) => Error::Eval(e.message),
        }
    }
}
