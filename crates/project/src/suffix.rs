// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project suffix and stem resolution (spec §4.G step 1).

use sjef_core::error::{Result, SjefError};
use std::path::Path;

/// Resolves the project suffix: the filename's own extension if it has
/// one, else `default_suffix`. Fails if both are empty.
pub fn resolve(filename: &str, default_suffix: &str) -> Result<String> {
    let ext = Path::new(filename).extension().and_then(|e| e.to_str()).filter(|e| !e.is_empty());
    let suffix = ext.map(str::to_string).unwrap_or_else(|| default_suffix.to_string());
    if suffix.is_empty() {
        return Err(SjefError::ConfigError("no project suffix given and no default supplied".into()));
    }
    Ok(suffix)
}

/// The project's stem: its file name with `.<suffix>` stripped.
pub fn stem_of(directory: &Path, suffix: &str) -> String {
    let name = directory.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.strip_suffix(&format!(".{suffix}")).unwrap_or(name).to_string()
}

#[cfg(test)]
#[path = "suffix_tests.rs"]
mod tests;
