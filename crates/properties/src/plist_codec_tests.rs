// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn encode_decode_round_trips() {
    let mut map = IndexMap::new();
    map.insert("_status".to_string(), "4".to_string());
    map.insert("backend".to_string(), "local".to_string());
    let xml = encode(&map);
    let decoded = decode(&xml).unwrap();
    assert_eq!(decoded, map);
}

#[test]
fn preserves_insertion_order() {
    let mut map = IndexMap::new();
    map.insert("z".to_string(), "1".to_string());
    map.insert("a".to_string(), "2".to_string());
    map.insert("m".to_string(), "3".to_string());
    let xml = encode(&map);
    let decoded = decode(&xml).unwrap();
    assert_eq!(decoded.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[test]
fn decodes_empty_string_value() {
    let xml = "<plist><dict><key>foo</key><string></string></dict></plist>";
    let decoded = decode(xml).unwrap();
    assert_eq!(decoded.get("foo"), Some(&"".to_string()));
}

#[test]
fn escapes_special_characters() {
    let mut map = IndexMap::new();
    map.insert("k".to_string(), "<a & b>".to_string());
    let xml = encode(&map);
    assert!(!xml.contains("<a & b>"));
    let decoded = decode(&xml).unwrap();
    assert_eq!(decoded.get("k"), Some(&"<a & b>".to_string()));
}

#[test]
fn empty_map_produces_empty_dict() {
    let xml = encode(&IndexMap::new());
    let decoded = decode(&xml).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn tolerates_missing_doctype() {
    let xml = "<plist><dict><key>a</key><string>b</string></dict></plist>";
    let decoded = decode(xml).unwrap();
    assert_eq!(decoded.get("a"), Some(&"b".to_string()));
}
