// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Customization-hook mechanism.
//!
//! The core never branches on a project's suffix string outside this
//! module. A `CustomizationHooks` implementation is a small capability
//! table of per-suffix routines; the application embedding this crate
//! registers one per suffix it cares about via [`register`]. Suffixes with
//! no registered hooks fall back to [`DefaultHooks`], which is a faithful
//! no-op: it never recognises application-specific content.
//!
//! A `molpro`-flavoured reference implementation is included, lifted from
//! the original source's `sjef-customization.cpp`, for test purposes only —
//! it is not a general library of hooks and downstream crates should not
//! depend on its presence for anything but exercising the capability-table
//! mechanism end to end.

use crate::status::Status;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Per-suffix routines that interpret application-specific content.
///
/// Every method has a sensible no-op default so a partial implementation
/// (e.g. only `status_from_output`) is legal.
pub trait CustomizationHooks: Send + Sync {
    /// Reconstructs the input that produced `output_xml`, or `""` if it
    /// cannot be deduced.
    fn input_from_output(&self, output_xml: &str) -> String {
        let _ = output_xml;
        String::new()
    }

    /// Examines `output_xml` for an application-specific completion marker.
    /// Returns `None` if nothing can be determined (caller should fall back
    /// to the persisted status).
    fn status_from_output(&self, output_xml: &str) -> Option<Status> {
        let _ = output_xml;
        None
    }

    /// Resolves a referenced-file directive embedded in one input line,
    /// inlining the referenced file's contents when `line` names one.
    fn referenced_file_contents(&self, line: &str, resolve: &dyn Fn(&str) -> Option<String>) -> String {
        let _ = resolve;
        line.to_string()
    }

    /// Called after a project file has been renamed, so application-private
    /// references to the old name can be rewritten.
    fn rewrite_input_file(&self, _input_file: &Path, _old_name: &str) {}

    /// Runs once, at project construction, before the backend registry is
    /// consulted.
    fn custom_initialisation(&self, _project_dir: &Path, _stem: &str) {}

    /// Runs immediately before a launch command is dispatched.
    fn custom_run_preface(&self, _run_directory_ignore: &mut std::collections::HashSet<String>, _stem: &str) {}

    /// Returns a suffix-appropriate default backend description, as a
    /// `(host, run_command)` pair layered onto the bare `local` backend.
    fn default_backend(&self) -> (String, String) {
        (String::new(), String::new())
    }
}

/// The hook set used for any suffix with nothing registered: every method
/// keeps its trait default, i.e. total silence.
pub struct DefaultHooks;
impl CustomizationHooks for DefaultHooks {}

/// The `molpro` reference hook, grounded on `sjef-customization.cpp`.
pub struct MolproHooks;

impl CustomizationHooks for MolproHooks {
    fn input_from_output(&self, output_xml: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"(?s)<job>.*?<input>(.*?)</input>").unwrap_or_else(|_| Regex::new("$^").unwrap())
        });
        let Some(caps) = re.captures(output_xml) else {
            return String::new();
        };
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        static P_TAG: OnceLock<Regex> = OnceLock::new();
        let p_tag = P_TAG.get_or_init(|| Regex::new(r"(?s)<p>(.*?)</p>").unwrap_or_else(|_| Regex::new("$^").unwrap()));
        let mut lines: Vec<&str> = Vec::new();
        for caps in p_tag.captures_iter(inner) {
            if let Some(m) = caps.get(1) {
                lines.push(m.as_str());
            }
        }
        let mut result = lines.join("\n");
        while result.ends_with('\n') {
            result.pop();
        }
        result
    }

    fn status_from_output(&self, output_xml: &str) -> Option<Status> {
        if output_xml.contains("<error") {
            Some(Status::Failed)
        } else {
            None
        }
    }

    fn referenced_file_contents(&self, line: &str, resolve: &dyn Fn(&str) -> Option<String>) -> String {
        let Some(pos) = line.find("geometry=") else {
            return line.to_string();
        };
        let rest = &line[pos + "geometry=".len()..];
        if rest.starts_with('{') {
            return line.to_string();
        }
        let name = rest.trim();
        if name.is_empty() {
            return line.to_string();
        }
        match resolve(name) {
            Some(contents) if !contents.is_empty() => contents.trim_end_matches('\n').to_string(),
            _ => line.to_string(),
        }
    }

    fn custom_run_preface(&self, run_directory_ignore: &mut std::collections::HashSet<String>, stem: &str) {
        run_directory_ignore.insert(format!("{stem}.pqb"));
    }

    fn default_backend(&self) -> (String, String) {
        (
            "localhost".to_string(),
            "molpro {-n %n!MPI size} {-M %M!Total memory} {-m %m!Process memory} {-G %G!GA memory}".to_string(),
        )
    }
}

type HookRegistry = Mutex<HashMap<String, &'static dyn CustomizationHooks>>;

fn registry() -> &'static HookRegistry {
    static REGISTRY: OnceLock<HookRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Registers `hooks` for `suffix`, replacing any prior registration.
///
/// `hooks` must be `'static` (typically a zero-sized unit struct, or
/// something obtained via `Box::leak`), mirroring the way the capability
/// table is wired up once at process start.
pub fn register(suffix: &str, hooks: &'static dyn CustomizationHooks) {
    registry().lock().unwrap_or_else(|e| e.into_inner()).insert(suffix.to_string(), hooks);
}

/// Looks up the hook set for `suffix`, falling back to [`DefaultHooks`].
pub fn for_suffix(suffix: &str) -> &'static dyn CustomizationHooks {
    static DEFAULT: DefaultHooks = DefaultHooks;
    registry()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(suffix)
        .copied()
        .unwrap_or(&DEFAULT)
}

/// Registers the bundled `molpro` reference hook. Exposed for tests and for
/// any embedder that wants the original's reference behaviour verbatim.
pub fn register_molpro() {
    static MOLPRO: MolproHooks = MolproHooks;
    register("molpro", &MOLPRO);
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
