// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint-style durable whole-file replace: write to a sibling
//! temporary file, fsync it, rename over the target, then fsync the parent
//! directory so the rename itself is durable. A failure partway (e.g. disk
//! full while writing the temporary file) must never leave the
//! previously-committed file visibly half-written.

use crate::error::{PropertyStoreError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Atomically replaces the contents of `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source: std::io::Error| PropertyStoreError::Io { path: path.display().to_string(), source };

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let tmp_path = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("Info.plist"),
        std::process::id()
    ));

    {
        let mut tmp = File::create(&tmp_path).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.sync_all().map_err(io_err)?;
    }

    std::fs::rename(&tmp_path, path).map_err(io_err)?;

    if let Ok(dir) = OpenOptions::new().read(true).open(parent) {
        // Best-effort: not all platforms allow opening a directory for
        // read, and not all filesystems require a directory fsync for the
        // rename to be durable; failures here are not fatal.
        let _ = dir.sync_all();
    }

    Ok(())
}

#[cfg(test)]
#[path = "atomic_save_tests.rs"]
mod tests;
