// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn local_backend_has_original_defaults() {
    let b = Backend::local();
    assert_eq!(b.name, "local");
    assert_eq!(b.host, "localhost");
    assert_eq!(b.cache, "${PWD}");
    assert_eq!(b.run_command, "sjef");
    assert_eq!(b.run_jobnumber, "([0-9]+)");
    assert_eq!(b.status_command, "/bin/ps -o pid,state -p");
    assert_eq!(b.status_running, "^S$");
    assert_eq!(b.status_waiting, "^[^SZ]$");
    assert_eq!(b.kill_command, "pkill -P");
}

#[test]
fn is_local_recognises_empty_and_localhost() {
    assert!(Backend::host_is_local(""));
    assert!(Backend::host_is_local("localhost"));
    assert!(!Backend::host_is_local("cluster.example.com"));
}

#[test]
fn apply_patch_overlays_only_nonempty_fields() {
    let mut b = Backend::local();
    let patch = Backend { host: "cluster".to_string(), ..Backend::blank("x") };
    b.apply_patch(&patch);
    assert_eq!(b.host, "cluster");
    assert_eq!(b.run_command, "sjef");
}

#[test]
fn dummy_backend_has_reserved_name() {
    assert_eq!(Backend::dummy().name, DUMMY_NAME);
    assert!(Backend::dummy().is_local());
}
