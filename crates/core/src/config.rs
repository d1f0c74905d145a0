// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide configuration: where the backend config and recent-project
//! files live, and which on-disk format is preferred for new writes.

use crate::error::{Result, SjefError};
use crate::path;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

/// On-disk encoding for backend configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFileFormat {
    Xml,
    Yaml,
}

impl BackendFileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BackendFileFormat::Xml => "xml",
            BackendFileFormat::Yaml => "yaml",
        }
    }

    pub fn other(self) -> Self {
        match self {
            BackendFileFormat::Xml => BackendFileFormat::Yaml,
            BackendFileFormat::Yaml => BackendFileFormat::Xml,
        }
    }
}

impl std::fmt::Display for BackendFileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

// 0 = xml (default), 1 = yaml. A process-wide setting, mirroring the
// original's `set_backend_config_file_suffix` global.
static PREFERRED_FORMAT: AtomicU8 = AtomicU8::new(0);

/// Sets the process-wide preferred backend-config file format.
pub fn set_preferred_backend_format(format: BackendFileFormat) {
    let code = match format {
        BackendFileFormat::Xml => 0,
        BackendFileFormat::Yaml => 1,
    };
    PREFERRED_FORMAT.store(code, Ordering::SeqCst);
}

/// Reads the process-wide preferred backend-config file format.
pub fn preferred_backend_format() -> BackendFileFormat {
    match PREFERRED_FORMAT.load(Ordering::SeqCst) {
        1 => BackendFileFormat::Yaml,
        _ => BackendFileFormat::Xml,
    }
}

/// Resolves `CONFIG_ROOT`: the `SJEF_CONFIG` environment variable if set,
/// else `~/.sjef`.
pub fn config_root() -> Result<PathBuf> {
    match std::env::var("SJEF_CONFIG") {
        Ok(v) if !v.is_empty() => path::expand(&v, ""),
        _ => path::expand("~/.sjef", ""),
    }
}

/// `<CONFIG_ROOT>/<suffix>` — the per-project-type configuration directory.
pub fn config_directory(project_suffix: &str) -> Result<PathBuf> {
    if project_suffix.is_empty() {
        return Err(SjefError::ConfigError("empty project suffix".into()));
    }
    Ok(config_root()?.join(project_suffix))
}

/// `<CONFIG_ROOT>/<suffix>/backends.<ext>`.
pub fn backend_config_file_path(project_suffix: &str, format: BackendFileFormat) -> Result<PathBuf> {
    Ok(config_directory(project_suffix)?.join(format!("backends.{}", format.extension())))
}

/// Resolves the site-wide configuration root from `SJEF_SITE_CONFIG`, if
/// set. Unlike [`config_root`] there is no default location: a site
/// administrator opts in explicitly, and most installations have none.
pub fn site_config_root() -> Result<Option<PathBuf>> {
    match std::env::var("SJEF_SITE_CONFIG") {
        Ok(v) if !v.is_empty() => path::expand(&v, "").map(Some),
        _ => Ok(None),
    }
}

/// `<SITE_CONFIG_ROOT>/<suffix>/backends.<ext>`, or `None` if no site
/// configuration root is configured.
pub fn site_backend_config_file_path(project_suffix: &str, format: BackendFileFormat) -> Result<Option<PathBuf>> {
    let Some(root) = site_config_root()? else {
        return Ok(None);
    };
    if project_suffix.is_empty() {
        return Err(SjefError::ConfigError("empty project suffix".into()));
    }
    Ok(Some(root.join(project_suffix).join(format!("backends.{}", format.extension()))))
}

/// `<CONFIG_ROOT>/<suffix>/projects` — the recent-projects list file.
pub fn recent_projects_file_path(project_suffix: &str) -> Result<PathBuf> {
    Ok(config_directory(project_suffix)?.join("projects"))
}

/// Maximum number of entries retained in the recent-projects list.
pub const RECENT_MAX: usize = 128;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
