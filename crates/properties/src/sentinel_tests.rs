// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sjef_core::writer_id::WriterId;
use tempfile::tempdir;

#[test]
fn missing_sentinel_is_not_written_by_anyone() {
    let dir = tempdir().unwrap();
    assert!(!written_by(dir.path(), WriterId::fresh()));
}

#[test]
fn records_and_recognises_writer() {
    let dir = tempdir().unwrap();
    let me = WriterId::fresh();
    record_writer(dir.path(), me).unwrap();
    assert!(written_by(dir.path(), me));
    assert!(!written_by(dir.path(), WriterId::fresh()));
}

#[test]
fn sentinel_file_has_documented_name() {
    let dir = tempdir().unwrap();
    record_writer(dir.path(), WriterId::fresh()).unwrap();
    assert!(dir.path().join(".Info.plist.writing_object").exists());
}
