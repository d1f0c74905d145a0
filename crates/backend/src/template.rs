// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-template parsing and expansion for `run_command` strings, e.g.
//! `molpro {-n %n!MPI size} {-M %M!Total memory}`.
//!
//! Grammar: `{prefix%name[:default][!doc]}`. A block not containing `%` is
//! a parse error. Blocks are never nested; `${...}` (a `{` immediately
//! preceded by `$`) is left untouched so shell variable syntax like
//! `${PWD}` can appear literally in a template.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid template: missing % in expression {{{0}}}")]
    MissingPercent(String),
    #[error("invalid template: unterminated {{ in {0:?}")]
    Unterminated(String),
}

/// One parsed element of a command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Verbatim text, copied through unchanged.
    Literal(String),
    /// A `{prefix%name[:default][!doc]}` substitution block.
    Substitution { prefix: String, name: String, default: String, doc: String },
}

/// A parsed `run_command` template: an ordered sequence of literal and
/// substitution elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    elements: Vec<TemplateElement>,
}

impl Template {
    /// Parses `source`. Every `{...}` block must contain `%`; otherwise
    /// this is a parse error, matching the original's behaviour.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut elements = Vec::new();
        let mut literal = String::new();
        let bytes: Vec<char> = source.chars().collect();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c == '{' && (i == 0 || bytes[i - 1] != '$') {
                let Some(close) = bytes[i + 1..].iter().position(|&c| c == '}') else {
                    return Err(TemplateError::Unterminated(source.to_string()));
                };
                let inner: String = bytes[i + 1..i + 1 + close].iter().collect();
                if !literal.is_empty() {
                    elements.push(TemplateElement::Literal(std::mem::take(&mut literal)));
                }
                elements.push(parse_block(&inner)?);
                i += close + 2;
            } else {
                literal.push(c);
                i += 1;
            }
        }
        if !literal.is_empty() {
            elements.push(TemplateElement::Literal(literal));
        }
        Ok(Template { elements })
    }

    /// Renders the template, resolving each substitution's parameter value
    /// via `resolve`. A block whose parameter resolves to `""` and has no
    /// default is elided entirely, prefix included.
    pub fn render(&self, resolve: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                TemplateElement::Literal(s) => out.push_str(s),
                TemplateElement::Substitution { prefix, name, default, .. } => {
                    let value = resolve(name);
                    if !value.is_empty() {
                        out.push_str(prefix);
                        out.push_str(&value);
                    } else if !default.is_empty() {
                        out.push_str(prefix);
                        out.push_str(default);
                    }
                }
            }
        }
        out
    }

    /// The parameter names referenced by this template, mapped to their
    /// default value (`doc = false`) or documentation string (`doc =
    /// true`).
    pub fn parameters(&self, doc: bool) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        for element in &self.elements {
            if let TemplateElement::Substitution { name, default, doc: d, .. } = element {
                result.insert(name.clone(), if doc { d.clone() } else { default.clone() });
            }
        }
        result
    }
}

fn parse_block(inner: &str) -> Result<TemplateElement, TemplateError> {
    let (body, doc) = match inner.find('!') {
        Some(pos) => (&inner[..pos], inner[pos + 1..].to_string()),
        None => (inner, String::new()),
    };
    let Some(percent) = body.find('%') else {
        return Err(TemplateError::MissingPercent(inner.to_string()));
    };
    let prefix = body[..percent].to_string();
    let rest = &body[percent + 1..];
    let (name, default) = match rest.find(':') {
        Some(pos) => (rest[..pos].to_string(), rest[pos + 1..].to_string()),
        None => (rest.to_string(), String::new()),
    };
    Ok(TemplateElement::Substitution { prefix, name, default, doc })
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
