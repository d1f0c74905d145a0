// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_ids_are_distinct() {
    let a = WriterId::fresh();
    let b = WriterId::fresh();
    assert_ne!(a, b);
}

#[test]
fn round_trips_through_string() {
    let id = WriterId::fresh();
    let text = id.to_string();
    let parsed: WriterId = text.parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn shares_the_same_pid_high_bits() {
    let a = WriterId::fresh();
    let b = WriterId::fresh();
    assert_eq!(a.as_u64() >> 32, b.as_u64() >> 32);
}
