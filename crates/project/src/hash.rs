// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! 64-bit string hashing for `input_hash` and `project_hash` (spec §4.G).
//!
//! Neither hash needs to be stable across processes built with a
//! different compiler, only stable within one process's lifetime and
//! reproducible from the same bytes; FNV-1a gives that cheaply, the same
//! choice `sjef-job::cache_dir` makes for the remote-cache directory name.

use std::path::Path;
use uuid::Uuid;

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Hashes `text` to a stable 64-bit value.
pub fn string_hash(text: &str) -> u64 {
    fnv1a(text.as_bytes())
}

/// Computes the input hash: each line of the input file, with any
/// referenced-file content the suffix's customization hook chooses to
/// inline, concatenated and hashed.
pub fn input_hash(input_path: &Path, suffix: &str) -> u64 {
    let Ok(contents) = std::fs::read_to_string(input_path) else {
        return string_hash("");
    };
    let hooks = sjef_core::hooks::for_suffix(suffix);
    let dir = input_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let resolve = |name: &str| -> Option<String> { std::fs::read_to_string(dir.join(name)).ok() };

    let mut combined = String::new();
    for line in contents.lines() {
        combined.push_str(&hooks.referenced_file_contents(line, &resolve));
        combined.push('\n');
    }
    string_hash(&combined)
}

/// Allocates a fresh, stable project identity: a random 32-character seed
/// fed through the same string hash, rendered as lowercase hex.
pub fn fresh_project_hash() -> String {
    format!("{:016x}", string_hash(&Uuid::new_v4().simple().to_string()))
}

/// Canonicalises whitespace for the `run_needed` live-input fallback
/// comparison: collapse runs of whitespace, trim each line.
pub fn canonicalise_whitespace(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
