// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-unique writer identity for the property-store "last writer"
//! sentinel.
//!
//! The original implementation tagged the sentinel with the address of the
//! writing `Project` object in memory. That is not a stable concept across
//! a Rust process (objects move, addresses are reused), so instead every
//! `Project`/`PropertyStore` instance is assigned an identity built from the
//! OS process id and a process-local atomic counter. Two instances in the
//! same process never collide; two instances in different processes never
//! collide because the pid differs.

use std::sync::atomic::{AtomicU32, Ordering};

static INSTANCE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A process-unique, instance-unique identifier, packed as
/// `(pid << 32) | instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterId(u64);

impl WriterId {
    /// Allocates a fresh id for a new Property Store / Project instance.
    pub fn fresh() -> Self {
        let pid = std::process::id() as u64;
        let instance = INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed) as u64;
        WriterId((pid << 32) | instance)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        WriterId(raw)
    }
}

impl std::fmt::Display for WriterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WriterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(WriterId)
    }
}

#[cfg(test)]
#[path = "writer_id_tests.rs"]
mod tests;
