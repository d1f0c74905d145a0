// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `<backends><backend name="..." host="..." .../></backends>` codec.
//!
//! Attribute emission order follows the original writer exactly: `name`,
//! `host`, `run_command`, `run_jobnumber`, `status_command`,
//! `status_waiting`, `status_running`, `kill_command`. `cache` is not
//! emitted by the XML writer in the source this is grounded on (a
//! long-standing asymmetry with the YAML writer) and is preserved here
//! for fidelity: a backend whose `cache` differs from the suffix default
//! should be configured via the YAML file instead.

use crate::backend::Backend;
use crate::error::{BackendConfigError, Result};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::BTreeMap;

/// Renders `backends` as a complete `backends.xml` document.
pub fn encode(backends: &BTreeMap<String, Backend>) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<backends>\n");
    for backend in backends.values() {
        out.push_str("  <backend name=\"");
        out.push_str(&escape(backend.name.as_str()));
        out.push('"');
        push_attr(&mut out, "host", &backend.host);
        push_attr(&mut out, "run_command", &backend.run_command);
        push_attr(&mut out, "run_jobnumber", &backend.run_jobnumber);
        push_attr(&mut out, "status_command", &backend.status_command);
        push_attr(&mut out, "status_waiting", &backend.status_waiting);
        push_attr(&mut out, "status_running", &backend.status_running);
        push_attr(&mut out, "kill_command", &backend.kill_command);
        out.push_str("\n  />\n");
    }
    out.push_str("</backends>\n");
    out
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        out.push_str("\n           ");
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

/// Parses a `backends.xml` document. Each `<backend>` is seeded from
/// [`Backend::local`] or [`Backend::linux_remote`] depending on its `host`
/// attribute, then patched attribute-by-attribute, matching the original
/// reader.
pub fn decode(source: &str) -> Result<BTreeMap<String, Backend>> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut result = BTreeMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) if tag.local_name().as_ref() == b"backend" => {
                let mut attrs = std::collections::HashMap::new();
                for attr in tag.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(|e| BackendConfigError::Xml(e.to_string()))?.into_owned();
                    attrs.insert(key, value);
                }
                let name = attrs.get("name").cloned().unwrap_or_default();
                if name.is_empty() {
                    continue;
                }
                let host = attrs.get("host").cloned().unwrap_or_default();
                let mut backend = if Backend::host_is_local(&host) { Backend::local() } else { Backend::linux_remote() };
                backend.name = name.clone();
                for (key, value) in &attrs {
                    if value.is_empty() {
                        continue;
                    }
                    match key.as_str() {
                        "host" => backend.host = value.clone(),
                        "cache" => backend.cache = value.clone(),
                        "run_command" => backend.run_command = value.clone(),
                        "run_jobnumber" => backend.run_jobnumber = value.clone(),
                        "status_command" => backend.status_command = value.clone(),
                        "status_running" => backend.status_running = value.clone(),
                        "status_waiting" => backend.status_waiting = value.clone(),
                        "kill_command" => backend.kill_command = value.clone(),
                        _ => {}
                    }
                }
                result.insert(name, backend);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(BackendConfigError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(result)
}

#[cfg(test)]
#[path = "xml_codec_tests.rs"]
mod tests;
