// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_a_single_backend() {
    let mut backends = BTreeMap::new();
    let b = Backend::local();
    backends.insert(b.name.clone(), b);
    let yaml = encode(&backends);
    let decoded = decode(&yaml).unwrap();
    assert_eq!(decoded.get("local").unwrap().run_command, "sjef");
    assert_eq!(decoded.get("local").unwrap().run_jobnumber, "([0-9]+)");
}

#[test]
fn empty_document_decodes_to_empty_map() {
    assert!(decode("").unwrap().is_empty());
    assert!(decode("   \n").unwrap().is_empty());
}

#[test]
fn special_leading_char_gets_quoted() {
    let mut backends = BTreeMap::new();
    let mut b = Backend::local();
    b.status_running = "^S$".to_string();
    backends.insert(b.name.clone(), b);
    let yaml = encode(&backends);
    assert!(yaml.contains("status_running: '^S$'"));
}

#[test]
fn run_jobnumber_round_trips_the_actual_value_not_a_hardcoded_constant() {
    let mut backends = BTreeMap::new();
    let mut b = Backend::local();
    b.run_jobnumber = "Submitted batch job ([0-9]+)".to_string();
    backends.insert(b.name.clone(), b);
    let yaml = encode(&backends);
    let decoded = decode(&yaml).unwrap();
    assert_eq!(decoded.get("local").unwrap().run_jobnumber, "Submitted batch job ([0-9]+)");
}
