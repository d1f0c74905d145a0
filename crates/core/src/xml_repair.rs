// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort repair of truncated or malformed XML fragments.
//!
//! Output from a killed or crashed backend process can be cut off mid-tag.
//! Rather than fail the whole status read, walk the open tags with a stack
//! and close whatever is still open, the way the original implementation
//! did via a single scanning regex.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*[^-]>|<!--|-->").unwrap_or_else(|_| Regex::new("$^").unwrap()));
static NODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^> /]*)").unwrap_or_else(|_| Regex::new("$^").unwrap()));

/// Repairs `source`, injecting `injections[name]` immediately before the
/// closing tag of any still-open node named `name`.
///
/// Idempotent: running the result back through `xml_repair` with the same
/// injection map returns it unchanged.
pub fn xml_repair(source: &str, injections: &[(&str, &str)]) -> String {
    if source.is_empty() {
        return "<?xml version=\"1.0\"?><root/>".to_string();
    }

    let mut nodes: Vec<String> = Vec::new();
    let mut comment_pending = false;
    let mut last_end = 0usize;

    for m in TOKEN.find_iter(source) {
        let pattern = m.as_str();
        if pattern.ends_with("/>") {
            // self-closing, no stack effect
        } else if pattern.as_bytes().get(1) == Some(&b'/') {
            nodes.pop();
        } else if pattern.starts_with("<!--") {
            comment_pending = true;
        } else if pattern.contains("-->") {
            comment_pending = false;
        } else if pattern.len() > 1 && pattern.starts_with('<') && !pattern.starts_with("<?") && !comment_pending {
            if let Some(caps) = NODE_NAME.captures(pattern) {
                if let Some(name) = caps.get(1) {
                    nodes.push(name.as_str().to_string());
                }
            }
        }
        last_end = m.end();
    }

    let mut result = source.to_string();
    if source[last_end..].contains('<') {
        // trailing fragment due to e.g. a full disk mid-write; truncate it.
        if let Some(idx) = source.rfind('<') {
            result.truncate(idx);
        }
    }
    if comment_pending {
        result.push_str("-->");
    }
    for node in nodes.iter().rev() {
        for (name, injection) in injections {
            if name == node {
                result.push_str(injection);
            }
        }
        result.push_str("</");
        result.push_str(node);
        result.push('>');
    }
    result
}

#[cfg(test)]
#[path = "xml_repair_tests.rs"]
mod tests;
