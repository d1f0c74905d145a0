// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_through_code() {
    for s in [
        Status::Unknown,
        Status::Running,
        Status::Waiting,
        Status::Completed,
        Status::Unevaluated,
        Status::Killed,
        Status::Failed,
    ] {
        assert_eq!(Status::from_code(s.code()), Some(s));
    }
}

#[test]
fn unevaluated_is_four() {
    assert_eq!(Status::Unevaluated.code(), 4);
}

#[test]
fn terminal_and_live_are_disjoint() {
    for s in [
        Status::Unknown,
        Status::Running,
        Status::Waiting,
        Status::Completed,
        Status::Unevaluated,
        Status::Killed,
        Status::Failed,
    ] {
        assert!(!(s.is_terminal() && s.is_live()));
    }
    assert!(Status::Running.is_live());
    assert!(Status::Waiting.is_live());
    assert!(Status::Completed.is_terminal());
    assert!(Status::Killed.is_terminal());
    assert!(Status::Failed.is_terminal());
}

#[test]
fn display_matches_user_visible_names() {
    assert_eq!(Status::Unknown.to_string(), "Not found");
    assert_eq!(Status::Running.to_string(), "Running");
    assert_eq!(Status::Failed.to_string(), "Failed");
}
