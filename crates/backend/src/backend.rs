// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Backend` record: everything needed to launch, poll and kill a job
//! on some host, local or remote.

/// The reserved name of the always-present local backend.
pub const DEFAULT_NAME: &str = "local";

/// The reserved name of the in-memory test backend (see [`Backend::dummy`]).
pub const DUMMY_NAME: &str = "__dummy";

/// A named description of how to run, poll and kill jobs on some host.
///
/// Field order and defaults are taken verbatim from the original
/// `Backend` constructor: an empty or `"localhost"` `host` means local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: String,
    pub host: String,
    pub cache: String,
    pub run_command: String,
    pub run_jobnumber: String,
    pub status_command: String,
    pub status_waiting: String,
    pub status_running: String,
    pub kill_command: String,
}

impl Backend {
    /// The unconfigured local backend: runs jobs as plain subprocesses in
    /// the project's own cache directory.
    pub fn local() -> Self {
        Backend {
            name: DEFAULT_NAME.to_string(),
            host: "localhost".to_string(),
            cache: "${PWD}".to_string(),
            run_command: "sjef".to_string(),
            run_jobnumber: "([0-9]+)".to_string(),
            status_command: "/bin/ps -o pid,state -p".to_string(),
            status_waiting: "^[^SZ]$".to_string(),
            status_running: "^S$".to_string(),
            kill_command: "pkill -P".to_string(),
        }
    }

    /// A bare Linux-flavoured remote backend, used as the base when a
    /// config file attribute set specifies a non-local host without a
    /// complete set of overrides.
    pub fn linux_remote() -> Self {
        Backend { host: String::new(), ..Backend::local() }
    }

    /// The in-memory `__dummy` backend, used for exercising the job
    /// lifecycle without a real subprocess. Its `run_command` is never
    /// actually invoked: `sjef-job` recognises [`DUMMY_NAME`] and runs the
    /// builtin routine directly (see spec/original `dummy.cpp`).
    pub fn dummy() -> Self {
        Backend {
            name: DUMMY_NAME.to_string(),
            host: "localhost".to_string(),
            cache: "${PWD}".to_string(),
            run_command: String::new(),
            run_jobnumber: String::new(),
            status_command: String::new(),
            status_waiting: String::new(),
            status_running: String::new(),
            kill_command: String::new(),
        }
    }

    /// Named with every field set to `""` except `name`, for layering
    /// partial config-file attribute sets on top of a base (`local()` or
    /// `linux_remote()`).
    pub fn blank(name: impl Into<String>) -> Self {
        Backend {
            name: name.into(),
            host: String::new(),
            cache: String::new(),
            run_command: String::new(),
            run_jobnumber: String::new(),
            status_command: String::new(),
            status_waiting: String::new(),
            status_running: String::new(),
            kill_command: String::new(),
        }
    }

    /// True if `host` is empty or `"localhost"`.
    pub fn is_local(&self) -> bool {
        Self::host_is_local(&self.host)
    }

    pub fn host_is_local(host: &str) -> bool {
        host.is_empty() || host == "localhost"
    }

    /// Overlays non-empty fields of `patch` onto `self`, mirroring the
    /// original config-file reader's attribute-by-attribute assignment.
    pub fn apply_patch(&mut self, patch: &Backend) {
        if !patch.host.is_empty() {
            self.host = patch.host.clone();
        }
        if !patch.cache.is_empty() {
            self.cache = patch.cache.clone();
        }
        if !patch.run_command.is_empty() {
            self.run_command = patch.run_command.clone();
        }
        if !patch.run_jobnumber.is_empty() {
            self.run_jobnumber = patch.run_jobnumber.clone();
        }
        if !patch.status_command.is_empty() {
            self.status_command = patch.status_command.clone();
        }
        if !patch.status_waiting.is_empty() {
            self.status_waiting = patch.status_waiting.clone();
        }
        if !patch.status_running.is_empty() {
            self.status_running = patch.status_running.clone();
        }
        if !patch.kill_command.is_empty() {
            self.kill_command = patch.kill_command.clone();
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
