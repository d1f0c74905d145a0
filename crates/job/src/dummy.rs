// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The builtin `__dummy` backend routine.
//!
//! `sjef-backend::DUMMY_NAME` names an in-tree test backend whose
//! `run_command` is never actually dispatched through a [`sjef_shell::Shell`]:
//! the Job Controller recognises the name and runs this routine directly,
//! writing a canonical `<stem>.out`/`<stem>.xml` pair so end-to-end tests
//! have a stable, backend-free fixture (spec §8 scenario 1, §9 open
//! questions).

use sjef_core::error::{Result, SjefError};
use std::path::Path;

/// The exact stdout-equivalent content written by a dummy run.
pub const DUMMY_OUT_CONTENTS: &str = "dummy";

/// The exact xml content written by a dummy run.
pub const DUMMY_XML_CONTENTS: &str = "<?xml version=\"1.0\"?>\n<root/>";

/// Writes `<stem>.out` and `<stem>.xml` into `directory`, synchronously.
/// Mirrors the synchronous-launch contract of [`sjef_shell::Shell::run`]:
/// on return the "job" has already finished.
pub fn run(directory: &Path, stem: &str) -> Result<()> {
    let out_path = directory.join(format!("{stem}.out"));
    let xml_path = directory.join(format!("{stem}.xml"));
    std::fs::write(&out_path, DUMMY_OUT_CONTENTS)
        .map_err(|e| SjefError::ShellExecError { host: "localhost".into(), command: "__dummy".into(), exit_code: -1, stdout: String::new(), stderr: e.to_string() })?;
    std::fs::write(&xml_path, DUMMY_XML_CONTENTS)
        .map_err(|e| SjefError::ShellExecError { host: "localhost".into(), command: "__dummy".into(), exit_code: -1, stdout: String::new(), stderr: e.to_string() })?;
    Ok(())
}

#[cfg(test)]
#[path = "dummy_tests.rs"]
mod tests;
