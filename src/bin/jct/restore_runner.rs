//! Handler for the `restore` verb.
//!
//! On overlay-rooted firmware a modified config lives in `/overlay` while
//! the shipped original stays under `/rom`. Restoring a file means deleting
//! the overlay copy and remounting `/` so the ROM version shows through.

use std::path::Path;
use std::process::Command;

use anyhow::Result;

/// Exit codes for `restore`; distinct from the common table because each
/// step of the sequence reports its own failure.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// No ROM source for this path.
    pub const NO_ROM_SOURCE: i32 = 1;
    /// No overlay copy; the file is already original.
    pub const NOTHING_TO_RESTORE: i32 = 2;
    /// Removing the overlay copy failed.
    pub const UNLINK_FAILED: i32 = 3;
    /// Remounting the root filesystem failed.
    pub const REMOUNT_FAILED: i32 = 4;
    /// Bad arguments (non-absolute path).
    pub const BAD_ARGUMENTS: i32 = 5;
}

pub fn run_restore(file: &Path) -> Result<i32> {
    let Some(target) = file.to_str().filter(|p| !p.is_empty()) else {
        eprintln!("Error: invalid config file path");
        return Ok(exit_codes::BAD_ARGUMENTS);
    };

    if !target.starts_with('/') {
        eprintln!(
            "Error: config file path must be absolute (start with '/'), got: '{target}'"
        );
        return Ok(exit_codes::BAD_ARGUMENTS);
    }

    let rom_path = format!("/rom{target}");
    let overlay_path = format!("/overlay{target}");

    if !Path::new(&rom_path).exists() {
        eprintln!("Error: original file '{rom_path}' not found");
        return Ok(exit_codes::NO_ROM_SOURCE);
    }

    if !Path::new(&overlay_path).exists() {
        eprintln!("Error: the file is original, nothing to restore");
        return Ok(exit_codes::NOTHING_TO_RESTORE);
    }

    if let Err(err) = std::fs::remove_file(&overlay_path) {
        eprintln!("Error: failed to remove overlay file '{overlay_path}': {err}");
        return Ok(exit_codes::UNLINK_FAILED);
    }

    let remounted = Command::new("mount")
        .args(["-o", "remount", "/"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !remounted {
        eprintln!("Error: failed to remount overlay filesystem");
        return Ok(exit_codes::REMOUNT_FAILED);
    }

    // Silent success.
    Ok(exit_codes::SUCCESS)
}
