// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `.Info.plist.writing_object` sentinel: a single integer identifying
//! the last writer, used to break the "two writers within one filesystem
//! mtime quantum" ambiguity (see `store::PropertyStore::refresh_if_stale`).

use crate::error::{PropertyStoreError, Result};
use sjef_core::writer_id::WriterId;
use std::path::{Path, PathBuf};

pub const SENTINEL_FILE_NAME: &str = ".Info.plist.writing_object";

pub fn sentinel_path(project_dir: &Path) -> PathBuf {
    project_dir.join(SENTINEL_FILE_NAME)
}

/// Reads the sentinel and reports whether it names `me`. A missing or
/// unparseable sentinel is treated as "not written by me".
pub fn written_by(project_dir: &Path, me: WriterId) -> bool {
    let path = sentinel_path(project_dir);
    match std::fs::read_to_string(&path) {
        Ok(contents) => contents.trim().parse::<WriterId>().map(|w| w == me).unwrap_or(false),
        Err(_) => false,
    }
}

/// Overwrites the sentinel with `me`'s identity.
pub fn record_writer(project_dir: &Path, me: WriterId) -> Result<()> {
    let path = sentinel_path(project_dir);
    std::fs::write(&path, me.to_string()).map_err(|source| PropertyStoreError::Io { path: path.display().to_string(), source })
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
