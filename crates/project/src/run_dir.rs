// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-directory bookkeeping: the `run_directories` property is a
//! space-separated list of stems (`<name>_<N>`), pruned to the ones
//! whose backing directory actually exists, with `N` allocated as the
//! smallest positive integer not already in use (spec §3, §4.G).

use std::path::{Path, PathBuf};

pub const RUN_SUBDIR: &str = "run";

/// Parses the `run_directories` property value.
pub fn parse(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Serialises a stem list back into the `run_directories` property value.
pub fn serialise(stems: &[String]) -> String {
    stems.join(" ")
}

/// The sequence number encoded in a run-directory stem `<name>_<N>`, if
/// `stem` has that shape for project name `name`.
pub fn sequence_number(stem: &str, name: &str) -> Option<u32> {
    stem.strip_prefix(name)?.strip_prefix('_')?.parse().ok()
}

/// The directory a run stem lives in: `<project_dir>/run/<stem>.<suffix>`.
pub fn directory_for(project_dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    project_dir.join(RUN_SUBDIR).join(format!("{stem}.{suffix}"))
}

/// Prunes `recorded` to the stems whose backing directory still exists,
/// in their original order.
pub fn existing(project_dir: &Path, suffix: &str, recorded: &[String]) -> Vec<String> {
    recorded.iter().filter(|stem| directory_for(project_dir, stem, suffix).is_dir()).cloned().collect()
}

/// The smallest positive integer not already used by any stem in
/// `existing`, for project name `name`.
pub fn next_sequence_number(existing: &[String], name: &str) -> u32 {
    let used: std::collections::HashSet<u32> = existing.iter().filter_map(|s| sequence_number(s, name)).collect();
    let mut n = 1;
    while used.contains(&n) {
        n += 1;
    }
    n
}

/// Resolves `current_run` (0 = most recent) against an ascending-by-N
/// ordered stem list, returning the selected stem.
pub fn select(ordered_ascending: &[String], current_run: usize) -> Option<&String> {
    if ordered_ascending.is_empty() {
        return None;
    }
    let index = ordered_ascending.len().checked_sub(1)?.checked_sub(current_run)?;
    ordered_ascending.get(index)
}

/// Sorts stems ascending by their encoded sequence number.
pub fn sort_ascending(stems: &mut [String], name: &str) {
    stems.sort_by_key(|s| sequence_number(s, name).unwrap_or(0));
}

#[cfg(test)]
#[path = "run_dir_tests.rs"]
mod tests;
