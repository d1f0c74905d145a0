// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glue between a [`Backend`]'s `run_command` and the [`Template`] engine.

use crate::backend::Backend;
use crate::error::Result;
use crate::template::Template;
use std::collections::BTreeMap;

/// Expands `backend.run_command` (or `template_override`, if given),
/// resolving each `%name` parameter via `resolve`.
pub fn expand(backend: &Backend, template_override: Option<&str>, resolve: impl Fn(&str) -> String) -> Result<String> {
    let source = template_override.unwrap_or(&backend.run_command);
    let template = Template::parse(source)?;
    Ok(template.render(resolve))
}

/// The parameters referenced by `backend.run_command`, mapped to their
/// default value (`doc = false`) or documentation string (`doc = true`).
pub fn parameters(backend: &Backend, doc: bool) -> Result<BTreeMap<String, String>> {
    let template = Template::parse(&backend.run_command)?;
    Ok(template.parameters(doc))
}

/// A suffix-appropriate default backend: `local()` adjusted by the
/// registered [`sjef_core::hooks::CustomizationHooks::default_backend`]
/// for `suffix`.
pub fn default_backend(suffix: &str) -> Backend {
    let mut backend = Backend::local();
    let (host, run_command) = sjef_core::hooks::for_suffix(suffix).default_backend();
    if !host.is_empty() {
        backend.host = host;
    }
    if !run_command.is_empty() {
        backend.run_command = run_command;
    }
    backend
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
