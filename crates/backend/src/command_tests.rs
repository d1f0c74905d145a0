// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn expand_uses_backend_run_command_by_default() {
    let mut backend = Backend::local();
    backend.run_command = "thing {%present} thing2".to_string();
    let out = expand(&backend, None, |name| if name == "present" { "123".to_string() } else { String::new() }).unwrap();
    assert_eq!(out, "thing 123 thing2");
}

#[test]
fn expand_prefers_explicit_template_override() {
    let backend = Backend::local();
    let out = expand(&backend, Some("custom {%x:fallback}"), |_| String::new()).unwrap();
    assert_eq!(out, "custom fallback");
}

#[test]
fn parameters_reports_defaults_and_docs() {
    let mut backend = Backend::local();
    backend.run_command = "molpro {-n %n!MPI size} {-M %M:1GB!Total memory}".to_string();
    let defaults = parameters(&backend, false).unwrap();
    assert_eq!(defaults.get("M"), Some(&"1GB".to_string()));
    let docs = parameters(&backend, true).unwrap();
    assert_eq!(docs.get("n"), Some(&"MPI size".to_string()));
}

#[test]
fn default_backend_layers_hook_onto_local() {
    sjef_core::hooks::register_molpro();
    let backend = default_backend("molpro");
    assert_eq!(backend.host, "localhost");
    assert!(backend.run_command.contains("molpro"));
    assert_eq!(backend.cache, "${PWD}");
}

#[test]
fn default_backend_falls_back_to_plain_local_for_unregistered_suffix() {
    let backend = default_backend("nonexistent_suffix_xyz");
    assert_eq!(backend.run_command, "sjef");
}
