// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_a_single_backend() {
    let mut backends = BTreeMap::new();
    let mut b = Backend::local();
    b.name = "local".to_string();
    backends.insert(b.name.clone(), b);
    let xml = encode(&backends);
    let decoded = decode(&xml).unwrap();
    assert_eq!(decoded.get("local").unwrap().run_command, "sjef");
}

#[test]
fn cache_is_not_emitted_by_the_xml_writer() {
    let mut backends = BTreeMap::new();
    let mut b = Backend::local();
    b.cache = "/custom/cache".to_string();
    backends.insert(b.name.clone(), b);
    let xml = encode(&backends);
    assert!(!xml.contains("cache="));
}

#[test]
fn remote_host_seeds_from_linux_remote_base() {
    let xml = r#"<?xml version="1.0"?><backends>
      <backend name="cluster" host="cluster.example.com" run_command="sbatch"/>
    </backends>"#;
    let decoded = decode(xml).unwrap();
    let b = decoded.get("cluster").unwrap();
    assert_eq!(b.host, "cluster.example.com");
    assert_eq!(b.run_command, "sbatch");
    assert!(!b.is_local());
}

#[test]
fn empty_attribute_does_not_override_seeded_default() {
    let xml = r#"<?xml version="1.0"?><backends>
      <backend name="local" run_command=""/>
    </backends>"#;
    let decoded = decode(xml).unwrap();
    assert_eq!(decoded.get("local").unwrap().run_command, "sjef");
}
