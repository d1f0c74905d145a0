// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path expansion: `~`, environment variables, relative resolution, suffix
//! enforcement.

use crate::error::{Result, SjefError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HOME_TILDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~").unwrap_or_else(|_| Regex::new("$^").unwrap()));
static ENV_VAR_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^{/]+)/").unwrap_or_else(|_| Regex::new("$^").unwrap()));
static ENV_VAR_BRACED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|_| Regex::new("$^").unwrap()));
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/\\]").unwrap_or_else(|_| Regex::new("$^").unwrap()));

/// Reads an environment variable, applying the documented fallbacks for
/// `HOME`/`USERPROFILE` and `TMPDIR`/`TEMP`.
fn environment(name: &str) -> Result<String> {
    if let Ok(v) = std::env::var(name) {
        return Ok(v);
    }
    match name {
        "HOME" if cfg!(windows) => std::env::var("USERPROFILE")
            .map_err(|_| SjefError::ConfigError("environment variable HOME/USERPROFILE is unset".into())),
        "USERPROFILE" => std::env::var("HOME")
            .map_err(|_| SjefError::ConfigError("environment variable USERPROFILE/HOME is unset".into())),
        "TMPDIR" if cfg!(windows) => std::env::var("TEMP")
            .map_err(|_| SjefError::ConfigError("environment variable TMPDIR/TEMP is unset".into())),
        "TMPDIR" => Ok("/tmp".to_string()),
        other => Err(SjefError::ConfigError(format!(
            "environment variable {other} is unset and has no documented default"
        ))),
    }
}

/// Expands `path` the way the original `expand_path` did: tilde, environment
/// variables, native separators, relative-to-cwd resolution, trailing
/// separator trim, and suffix enforcement.
pub fn expand(path: &str, default_suffix: &str) -> Result<PathBuf> {
    let mut text = path.to_string();

    let home = if cfg!(windows) {
        environment("USERPROFILE")?
    } else {
        environment("HOME")?
    };
    text = HOME_TILDE.replace_all(&text, home.replace('$', "$$")).into_owned();

    if cfg!(windows) {
        if let Ok(home) = environment("USERPROFILE") {
            text = text.replace("${HOME}", &home);
            text = text.replace("$HOME/", &format!("{home}/"));
        }
        if let Ok(tmp) = environment("TMPDIR") {
            text = text.replace("${TMPDIR}", &tmp);
            text = text.replace("$TMPDIR/", &format!("{tmp}/"));
        }
    }

    loop {
        let Some(caps) = ENV_VAR_SLASH.captures(&text) else { break };
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string();
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
        let replacement = format!("{}/", environment(&name)?);
        text = text.replacen(&whole, &replacement, 1);
    }
    loop {
        let Some(caps) = ENV_VAR_BRACED.captures(&text) else { break };
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string();
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
        let replacement = environment(&name)?;
        text = text.replacen(&whole, &replacement, 1);
    }

    let native_sep = std::path::MAIN_SEPARATOR.to_string();
    text = SEPARATORS.replace_all(&text, native_sep.as_str()).into_owned();

    let looks_absolute = if cfg!(windows) {
        text.chars().nth(1) == Some(':')
    } else {
        text.starts_with(std::path::MAIN_SEPARATOR)
    };
    if !looks_absolute {
        let cwd = std::env::current_dir()
            .map_err(|e| SjefError::ConfigError(format!("cannot resolve current directory: {e}")))?;
        text = cwd.join(&text).to_string_lossy().into_owned();
    }

    while text.len() > 1 && text.ends_with(std::path::MAIN_SEPARATOR) {
        text.pop();
    }

    if !default_suffix.is_empty() {
        let current_ext = Path::new(&text).extension().and_then(|e| e.to_str());
        if current_ext != Some(default_suffix) {
            text.push('.');
            text.push_str(default_suffix);
        }
    }

    Ok(PathBuf::from(text))
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
