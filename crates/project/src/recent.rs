// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-suffix recent-projects list: `<CONFIG_ROOT>/<suffix>/projects`,
//! one absolute path per line, newest first, truncated to
//! [`sjef_core::config::RECENT_MAX`] entries, edited under that
//! directory's `Locker` and a write-to-temp-then-rename (spec §6, §5).

use sjef_core::config::{self, RECENT_MAX};
use sjef_core::error::{Result, SjefError};
use std::path::Path;

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path).map(|c| c.lines().map(str::to_string).collect()).unwrap_or_default()
}

fn write_lines_atomic(path: &Path, lines: &[String]) -> Result<()> {
    let io_err = |e: std::io::Error| SjefError::ConfigError(format!("recent-projects list I/O error on {}: {e}", path.display()));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(&tmp_path, contents).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// Returns the 1-based position of `path` in `suffix`'s recent list, or 0
/// if it is not present. Non-existent entries are not pruned by a mere
/// lookup — only [`edit`] mutates the list.
pub fn find(suffix: &str, path: &Path) -> Result<usize> {
    let file = config::recent_projects_file_path(suffix)?;
    let locker = sjef_locker::locker_for_path(file.parent().unwrap_or(Path::new(".")));
    let _bolt = locker.bolt()?;
    let lines = read_lines(&file);
    let needle = path.to_string_lossy();
    Ok(lines.iter().position(|l| l == needle.as_ref()).map(|i| i + 1).unwrap_or(0))
}

/// Moves-or-inserts `path` at the front of `suffix`'s recent list
/// (`add = true`), or removes it (`add = false`). Drops entries whose
/// target no longer exists, then truncates to [`RECENT_MAX`].
pub fn edit(suffix: &str, path: &Path, add: bool) -> Result<()> {
    let file = config::recent_projects_file_path(suffix)?;
    let locker = sjef_locker::locker_for_path(file.parent().unwrap_or(Path::new(".")));
    let _bolt = locker.bolt()?;

    let mut lines = read_lines(&file);
    let needle = path.to_string_lossy().into_owned();
    lines.retain(|l| l != &needle);
    lines.retain(|l| Path::new(l).exists());

    if add {
        lines.insert(0, needle);
    }
    lines.truncate(RECENT_MAX);
    write_lines_atomic(&file, &lines)
}

#[cfg(test)]
#[path = "recent_tests.rs"]
mod tests;
