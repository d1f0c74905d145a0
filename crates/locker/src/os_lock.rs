// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The OS-level advisory lock primitive, isolated behind a narrow function
//! so the monitor in `lib.rs` never touches file descriptors directly.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Opens (creating if absent) the file at `path` and blocks until an
/// exclusive advisory lock on it is obtained. The returned `File` must be
/// kept alive for the duration of the lock; dropping it releases the lock.
pub fn open_and_lock(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().read(true).write(true).create(true).open(path)?;
    file.lock_exclusive()?;
    Ok(file)
}

#[cfg(test)]
#[path = "os_lock_tests.rs"]
mod tests;
