// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn result_is_absolute() {
    let p = expand("some/relative/dir", "").unwrap();
    assert!(p.is_absolute());
}

#[test]
fn expand_is_idempotent() {
    let once = expand("~/projects/foo", "sjef").unwrap();
    let twice = expand(once.to_str().unwrap(), "sjef").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn appends_missing_suffix() {
    let p = expand("/tmp/foo", "sjef").unwrap();
    assert_eq!(p.extension().and_then(|e| e.to_str()), Some("sjef"));
}

#[test]
fn leaves_matching_suffix_alone() {
    let p = expand("/tmp/foo.sjef", "sjef").unwrap();
    assert_eq!(p.to_str().unwrap().matches(".sjef").count(), 1);
}

#[test]
fn strips_trailing_separator() {
    let p = expand("/tmp/foo/", "").unwrap();
    assert!(!p.to_str().unwrap().ends_with('/'));
}

#[test]
fn expands_tilde_to_home() {
    let home = std::env::var("HOME").unwrap();
    let p = expand("~/x", "").unwrap();
    assert!(p.to_str().unwrap().starts_with(&home));
}

#[test]
fn expands_braced_env_var() {
    std::env::set_var("SJEF_TEST_VAR", "/opt/sjeftest");
    let p = expand("${SJEF_TEST_VAR}/data", "").unwrap();
    assert!(p.to_str().unwrap().starts_with("/opt/sjeftest/data"));
    std::env::remove_var("SJEF_TEST_VAR");
}

#[test]
fn unbound_variable_without_default_fails() {
    std::env::remove_var("SJEF_DEFINITELY_UNSET");
    let err = expand("${SJEF_DEFINITELY_UNSET}/x", "").unwrap_err();
    assert!(matches!(err, SjefError::ConfigError(_)));
}
