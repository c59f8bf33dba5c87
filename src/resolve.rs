//! Short-name file resolution.
//!
//! A target that contains a path separator or ends with `.json` is an
//! *explicit path* and is used as-is. Anything else is a *short name* probed
//! against an ordered candidate list:
//!
//! 1. `./<name>`
//! 2. `./<name>.json`
//! 3. `/etc/<name>.json` (not on Windows)
//!
//! A candidate that does not exist, or exists but is not a regular file
//! (symlinks followed), is skipped. A candidate that is a regular file but
//! not readable halts the search immediately with a permission error —
//! later candidates are never consulted. If the list is exhausted the
//! resolution fails with a diagnostic naming every candidate tried.
//!
//! With tracing enabled each probe is reported as a `[trace] ` line on
//! stderr, matching the CLI's `--trace-resolve` contract.

use std::fs;
use std::path::PathBuf;

use crate::error::Error;

/// True when `target` names a file directly rather than a short name.
pub fn is_explicit(target: &str) -> bool {
    target.contains('/') || target.contains('\\') || target.ends_with(".json")
}

/// Resolve a target to a filesystem path.
///
/// Explicit paths pass through unvalidated; short names search the
/// candidate list. Failures are [`Error::NotFound`] (nothing matched) or
/// [`Error::PermissionDenied`] (an unreadable regular file halted the
/// search).
pub fn resolve(target: &str, trace: bool) -> Result<PathBuf, Error> {
    if is_explicit(target) {
        if trace {
            eprintln!("[trace] explicit path used: {target}");
        }
        return Ok(PathBuf::from(target));
    }

    let mut candidates = vec![format!("./{target}"), format!("./{target}.json")];
    if !cfg!(windows) {
        candidates.push(format!("/etc/{target}.json"));
    }

    for candidate in &candidates {
        if trace {
            eprint!("[trace] checking {candidate}... ");
        }

        let metadata = match fs::metadata(candidate) {
            Ok(metadata) => metadata,
            Err(_) => {
                if trace {
                    eprintln!("not found");
                }
                continue;
            }
        };

        if metadata.is_dir() {
            if trace {
                eprintln!("is a directory, skip");
            }
            continue;
        }
        if !metadata.is_file() {
            if trace {
                eprintln!("not a regular file, skip");
            }
            continue;
        }

        // A regular file that cannot be opened for reading halts the
        // search; falling through to a later candidate would mask the
        // permission problem.
        if fs::File::open(candidate).is_err() {
            if trace {
                eprintln!("exists but not readable -> permission denied");
            }
            return Err(Error::PermissionDenied(candidate.clone()));
        }

        if trace {
            eprintln!("selected");
            eprintln!("[trace] resolved to: {candidate}");
        }
        return Ok(PathBuf::from(candidate));
    }

    if trace {
        eprintln!("[trace] no matching file found for '{target}'");
    }
    Err(Error::not_found(format!(
        "no JSON file found for '{target}'; tried: {}",
        candidates.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests that probe relative candidates must not change the working
    // directory concurrently.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn explicit_targets_pass_through() {
        assert!(is_explicit("./prudynt"));
        assert!(is_explicit("configs/app"));
        assert!(is_explicit("prudynt.json"));
        assert!(is_explicit("/etc/prudynt.json"));
        assert!(is_explicit(r"c:\configs\app"));
        assert!(!is_explicit("prudynt"));

        let path = resolve("sub/dir/missing.json", false).unwrap();
        assert_eq!(path, PathBuf::from("sub/dir/missing.json"));
    }

    #[test]
    fn short_name_prefers_bare_file_over_json() {
        let _guard = CWD_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let run = || {
            File::create("cfg").unwrap().write_all(b"{}").unwrap();
            File::create("cfg.json").unwrap().write_all(b"{}").unwrap();
            let first = resolve("cfg", false).unwrap();

            std::fs::remove_file("cfg").unwrap();
            let second = resolve("cfg", false).unwrap();
            (first, second)
        };
        let (first, second) = run();

        std::env::set_current_dir(prev).unwrap();
        assert_eq!(first, PathBuf::from("./cfg"));
        assert_eq!(second, PathBuf::from("./cfg.json"));
    }

    #[test]
    fn missing_short_name_lists_candidates() {
        let err = resolve("definitely-not-a-config-here", false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("./definitely-not-a-config-here"));
        assert!(message.contains("./definitely-not-a-config-here.json"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_candidate_halts_the_search() {
        use std::os::unix::fs::PermissionsExt;

        let _guard = CWD_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let outcome = (|| {
            File::create("cfg").unwrap().write_all(b"{}").unwrap();
            File::create("cfg.json").unwrap().write_all(b"{}").unwrap();
            std::fs::set_permissions("cfg", std::fs::Permissions::from_mode(0o000)).unwrap();
            resolve("cfg", false)
        })();

        std::env::set_current_dir(prev).unwrap();

        // Root bypasses permission bits; only assert when the probe can fail.
        if outcome.is_err() {
            assert!(matches!(outcome, Err(Error::PermissionDenied(p)) if p == "./cfg"));
        }
    }
}
