// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small filesystem helpers backing run-directory allocation, `copy()` and
//! `move()`: a name-excluding recursive tree copy, and a flat stem rename.

use sjef_core::error::{Result, SjefError};
use std::path::Path;

fn io_err(path: &Path, source: std::io::Error) -> SjefError {
    SjefError::ConfigError(format!("I/O error on {}: {source}", path.display()))
}

/// Recursively copies `src` into `dest`, skipping any entry (at any
/// depth) whose file name is in `exclude_names`. Used both for
/// `run_directory_new` (excluding `run/`, `Info.plist`, the writer
/// sentinel) and for `copy()` (excluding nothing).
pub fn copy_tree_excluding(src: &Path, dest: &Path, exclude_names: &[&str]) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;
    for entry in std::fs::read_dir(src).map_err(|e| io_err(src, e))? {
        let entry = entry.map_err(|e| io_err(src, e))?;
        let name = entry.file_name();
        if exclude_names.iter().any(|excluded| name.to_string_lossy() == *excluded) {
            continue;
        }
        let src_path = entry.path();
        let dest_path = dest.join(&name);
        if src_path.is_dir() {
            copy_tree_excluding(&src_path, &dest_path, exclude_names)?;
        } else {
            std::fs::copy(&src_path, &dest_path).map_err(|e| io_err(&src_path, e))?;
        }
    }
    Ok(())
}

/// Renames every top-level file named `<old_stem>.<anything>` in `dir` to
/// `<new_stem>.<anything>`. Does not recurse into subdirectories: run
/// directories keep their own sequence-numbered stems regardless of a
/// project rename.
pub fn rename_stem_files(dir: &Path, old_stem: &str, new_stem: &str) -> Result<()> {
    let prefix = format!("{old_stem}.");
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if let Some(rest) = name.strip_prefix(&prefix) {
            let new_path = path.with_file_name(format!("{new_stem}.{rest}"));
            std::fs::rename(&path, &new_path).map_err(|e| io_err(&path, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "fsutil_tests.rs"]
mod tests;
