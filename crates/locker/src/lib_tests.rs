// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::tempdir;

fn locker(dir: &tempfile::TempDir) -> Arc<Locker> {
    Arc::new(Locker::new(dir.path().join(".lock"), None))
}

#[test]
fn bolt_is_reentrant_on_the_owning_thread() {
    let dir = tempdir().unwrap();
    let l = locker(&dir);
    let outer = l.bolt().unwrap();
    let inner = l.bolt().unwrap();
    drop(inner);
    drop(outer);
}

#[test]
fn directory_target_locks_dotlock_inside_it() {
    let dir = tempdir().unwrap();
    let l = Arc::new(Locker::new(dir.path().to_path_buf(), None));
    assert_eq!(l.lock_path(), dir.path().join(".lock"));
    let _bolt = l.bolt().unwrap();
    assert!(dir.path().join(".lock").exists());
}

#[test]
fn other_thread_blocks_until_release() {
    let dir = tempdir().unwrap();
    let l = locker(&dir);
    let bolt = l.bolt().unwrap();

    let other_acquired = Arc::new(AtomicBool::new(false));
    let l2 = Arc::clone(&l);
    let flag = Arc::clone(&other_acquired);
    let handle = std::thread::spawn(move || {
        let _b = l2.bolt().unwrap();
        flag.store(true, Ordering::SeqCst);
    });

    std::thread::sleep(Duration::from_millis(50));
    assert!(!other_acquired.load(Ordering::SeqCst));

    drop(bolt);
    handle.join().unwrap();
    assert!(other_acquired.load(Ordering::SeqCst));
}

#[test]
fn lock_file_is_created_but_never_deleted() {
    let dir = tempdir().unwrap();
    let l = locker(&dir);
    {
        let _bolt = l.bolt().unwrap();
    }
    assert!(dir.path().join(".lock").exists());
}

#[test]
fn lock_file_contents_are_preserved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".lock");
    std::fs::write(&path, b"keepme").unwrap();
    let l = Arc::new(Locker::new(path.clone(), None));
    {
        let _bolt = l.bolt().unwrap();
    }
    assert_eq!(std::fs::read(&path).unwrap(), b"keepme");
}
