// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `name:\n  host: ...\n  run_command: >\n    ...\n` codec.
//!
//! Key emission order follows the original writer: `host`, `run_command`
//! (folded block scalar), `cache`, `run_jobnumber`, `status_command`,
//! `status_running`, `status_waiting`, `kill_command`.
//!
//! Unlike the XML codec this one is not a byte-for-byte port: the source
//! writer hard-codes a Slurm-style constant for `run_jobnumber` instead of
//! emitting the backend's actual value, silently corrupting it on every
//! re-save. That is not reproduced here; `run_jobnumber` round-trips.

use crate::backend::Backend;
use crate::error::Result;
use std::collections::BTreeMap;

const YAML_SPECIALS: &str = "{}[]&:*#?|-<>=!%@/";

fn quote_if_special(value: &str) -> String {
    let needs_quote = value.chars().next().map(|c| YAML_SPECIALS.contains(c)).unwrap_or(false);
    if needs_quote {
        format!("'{value}'")
    } else {
        value.to_string()
    }
}

fn emit_scalar(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str("  ");
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&quote_if_special(value));
    out.push('\n');
}

fn emit_folded(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str("  ");
    out.push_str(key);
    out.push_str(": >\n    ");
    out.push_str(&quote_if_special(value));
    out.push('\n');
}

/// Renders `backends` as a complete `backends.yaml` document.
pub fn encode(backends: &BTreeMap<String, Backend>) -> String {
    let mut out = String::new();
    for backend in backends.values() {
        out.push_str(&backend.name);
        out.push_str(":\n");
        emit_scalar(&mut out, "host", &backend.host);
        emit_folded(&mut out, "run_command", &backend.run_command);
        emit_scalar(&mut out, "cache", &backend.cache);
        emit_scalar(&mut out, "run_jobnumber", &backend.run_jobnumber);
        emit_scalar(&mut out, "status_command", &backend.status_command);
        emit_scalar(&mut out, "status_running", &backend.status_running);
        emit_scalar(&mut out, "status_waiting", &backend.status_waiting);
        emit_scalar(&mut out, "kill_command", &backend.kill_command);
        out.push('\n');
    }
    out
}

/// Parses a `backends.yaml` document. Every backend entry is seeded from
/// [`Backend::local`] (the original reader does this unconditionally,
/// regardless of `host`) and patched key-by-key.
pub fn decode(source: &str) -> Result<BTreeMap<String, Backend>> {
    if source.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let doc: serde_yaml::Value = serde_yaml::from_str(source)?;
    let mut result = BTreeMap::new();
    let Some(top) = doc.as_mapping() else {
        return Ok(result);
    };
    for (name_value, entry) in top {
        let Some(name) = name_value.as_str() else { continue };
        let mut backend = Backend::local();
        backend.name = name.to_string();
        if let Some(mapping) = entry.as_mapping() {
            for (key_value, value_value) in mapping {
                let Some(key) = key_value.as_str() else { continue };
                let value = match value_value {
                    serde_yaml::Value::String(s) => s.trim_end_matches('\n').to_string(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                match key {
                    "host" => backend.host = value,
                    "cache" => backend.cache = value,
                    "run_command" => backend.run_command = value,
                    "run_jobnumber" => backend.run_jobnumber = value,
                    "status_command" => backend.status_command = value,
                    "status_running" => backend.status_running = value,
                    "status_waiting" => backend.status_waiting = value,
                    "kill_command" => backend.kill_command = value,
                    _ => {}
                }
            }
        }
        result.insert(name.to_string(), backend);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "yaml_codec_tests.rs"]
mod tests;
