// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-global table mapping an absolute lock-file path to the one
//! `Locker` instance that owns it. Two `Project`s (or anything else) naming
//! the same file get the same `Locker`, and therefore share one
//! re-entrancy/ownership domain.

use crate::Locker;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

fn table() -> &'static Mutex<HashMap<PathBuf, Arc<Locker>>> {
    static TABLE: OnceLock<Mutex<HashMap<PathBuf, Arc<Locker>>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the process-wide `Locker` for `path`, creating it on first use.
///
/// `path` should already be absolute (callers typically pass the output of
/// `sjef_core::path::expand`); it is used verbatim as the interning key, so
/// two different relative spellings of the same file are not recognised as
/// equal.
pub fn locker_for_path(path: impl AsRef<Path>) -> Arc<Locker> {
    let path = path.as_ref();
    let mut table = table().lock();
    if let Some(existing) = table.get(path) {
        return Arc::clone(existing);
    }
    let locker = Arc::new(Locker::new(path.to_path_buf(), None));
    table.insert(path.to_path_buf(), Arc::clone(&locker));
    locker
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
