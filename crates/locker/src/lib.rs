// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Re-entrant, thread-aware, cross-process exclusive file locking.
//!
//! A [`Locker`] is bound to a lock-file path. [`Locker::bolt`] returns a
//! scoped [`Bolt`] acquisition: the owning thread may call `bolt()` again
//! while already holding one without blocking (re-entrant), but any other
//! thread — in this process or another — blocks until every outstanding
//! `Bolt` in the owning thread is dropped.
//!
//! Lockers are interned process-globally per absolute path via
//! [`locker_for_path`], so two `Project`s (or any other callers) that name
//! the same file share one `Locker` instance and therefore one re-entrancy
//! domain.

mod os_lock;
mod registry;

use parking_lot::{Condvar, Mutex};
use sjef_core::error::{Result, SjefError};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::ThreadId;

pub use registry::locker_for_path;

/// Name of the lock file created inside a directory target, when the
/// constructor is not given an explicit stem.
pub const DEFAULT_DIRECTORY_LOCK_FILE: &str = ".lock";

struct State {
    bolts: HashMap<ThreadId, u32>,
    held_by: Option<ThreadId>,
    file: Option<File>,
}

impl State {
    fn new() -> Self {
        State { bolts: HashMap::new(), held_by: None, file: None }
    }
}

/// A re-entrant, thread- and process-exclusive lock bound to one file path.
pub struct Locker {
    lock_path: PathBuf,
    state: Mutex<State>,
    condvar: Condvar,
}

impl Locker {
    /// Creates a Locker targeting `path`. If `path` is a directory, the
    /// effective lock file is `<path>/<directory_lock_file>` (default
    /// `.lock`); the lock file is created on first acquisition if absent
    /// and its contents are never touched or removed.
    pub fn new(path: impl Into<PathBuf>, directory_lock_file: Option<&str>) -> Self {
        let path = path.into();
        let lock_path = if path.is_dir() {
            path.join(directory_lock_file.unwrap_or(DEFAULT_DIRECTORY_LOCK_FILE))
        } else {
            path
        };
        Locker { lock_path, state: Mutex::new(State::new()), condvar: Condvar::new() }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Acquires a scoped, re-entrant bolt. Blocks until available.
    #[tracing::instrument(skip(self), fields(path = %self.lock_path.display()))]
    pub fn bolt(self: &Arc<Self>) -> Result<Bolt> {
        let tid = std::thread::current().id();
        let mut state = self.state.lock();

        if let Some(depth) = state.bolts.get_mut(&tid) {
            *depth += 1;
            tracing::trace!(depth = *depth, "re-entrant bolt acquired");
            drop(state);
            return Ok(Bolt { locker: Arc::clone(self) });
        }

        while state.held_by.is_some() {
            self.condvar.wait(&mut state);
        }
        state.held_by = Some(tid);
        state.bolts.insert(tid, 1);
        drop(state);

        tracing::debug!("acquiring process-exclusive lock");
        let file = os_lock::open_and_lock(&self.lock_path)
            .map_err(|source| SjefError::LockIoError { path: self.lock_path.display().to_string(), source })?;

        let mut state = self.state.lock();
        state.file = Some(file);
        drop(state);

        Ok(Bolt { locker: Arc::clone(self) })
    }

    fn release(&self) {
        let tid = std::thread::current().id();
        let mut state = self.state.lock();
        let Some(depth) = state.bolts.get_mut(&tid) else {
            // Defensive: release without a matching bolt should never happen
            // in correct usage, but must not panic in production code.
            tracing::error!("release called without a held bolt");
            return;
        };
        *depth -= 1;
        if *depth == 0 {
            state.bolts.remove(&tid);
            state.held_by = None;
            let file = state.file.take();
            drop(state);
            drop(file);
            self.condvar.notify_one();
            tracing::debug!("released process-exclusive lock");
        }
    }
}

/// RAII scoped acquisition of a [`Locker`]. Released on any exit path,
/// including unwinding.
pub struct Bolt {
    locker: Arc<Locker>,
}

impl Drop for Bolt {
    fn drop(&mut self) {
        self.locker.release();
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
