// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sjef_locker::locker_for_path;
use tempfile::tempdir;

fn open(dir: &std::path::Path) -> PropertyStore {
    let locker = locker_for_path(dir);
    PropertyStore::open(dir, locker).unwrap().0
}

#[test]
fn fresh_store_creates_empty_plist() {
    let dir = tempdir().unwrap();
    let (_store, created) = PropertyStore::open(dir.path(), locker_for_path(dir.path())).unwrap();
    assert!(created);
    assert!(dir.path().join(PROPERTY_FILE_NAME).exists());
}

#[test]
fn reopening_existing_plist_reports_not_created() {
    let dir = tempdir().unwrap();
    let locker = locker_for_path(dir.path());
    let _first = PropertyStore::open(dir.path(), locker.clone()).unwrap();
    let (_second, created) = PropertyStore::open(dir.path(), locker).unwrap();
    assert!(!created);
}

#[test]
fn set_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    store.set("greeting", "hello").unwrap();
    assert_eq!(store.get("greeting").unwrap(), "hello");
}

#[test]
fn get_absent_key_is_empty_string() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    assert_eq!(store.get("nope").unwrap(), "");
}

#[test]
fn delete_removes_key() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    store.set("k", "v").unwrap();
    store.delete("k").unwrap();
    assert_eq!(store.get("k").unwrap(), "");
}

#[test]
fn names_preserves_insertion_order() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    store.set("z", "1").unwrap();
    store.set("a", "2").unwrap();
    assert_eq!(store.names().unwrap(), vec!["z".to_string(), "a".to_string()]);
}

#[test]
fn get_many_returns_only_present_keys() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    store.set("present", "yes").unwrap();
    let found = store.get_many(&["present", "absent"]).unwrap();
    assert_eq!(found.get("present"), Some(&"yes".to_string()));
    assert!(!found.contains_key("absent"));
}

#[test]
fn properties_survive_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = open(dir.path());
        store.set("persisted", "value").unwrap();
    }
    let store2 = open(dir.path());
    assert_eq!(store2.get("persisted").unwrap(), "value");
}

/// Spec §8 scenario 2: two instances over the same file see each other's
/// writes, modulo one mtime-quantum cache-invalidation tick.
#[test]
fn two_instances_observe_each_others_writes() {
    let dir = tempdir().unwrap();
    let locker = locker_for_path(dir.path());
    let a = PropertyStore::open(dir.path(), locker.clone()).unwrap().0;
    let b = PropertyStore::open(dir.path(), locker).unwrap().0;

    a.set("testprop", "v1").unwrap();
    assert_eq!(b.get("testprop").unwrap(), "v1");

    a.set("testprop", "v2").unwrap();
    assert_eq!(b.get("testprop").unwrap(), "v2");

    a.delete("testprop").unwrap();
    assert_eq!(b.get("testprop").unwrap(), "");
}

#[test]
fn set_many_is_atomic_over_the_whole_map() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    let mut updates = indexmap::IndexMap::new();
    updates.insert("a".to_string(), "1".to_string());
    updates.insert("b".to_string(), "2".to_string());
    store.set_many(&updates).unwrap();
    assert_eq!(store.get("a").unwrap(), "1");
    assert_eq!(store.get("b").unwrap(), "2");
}

#[test]
fn set_overwrites_existing_value() {
    let dir = tempdir().unwrap();
    let store = open(dir.path());
    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap(), "second");
    assert_eq!(store.names().unwrap().iter().filter(|n| *n == "k").count(), 1);
}
