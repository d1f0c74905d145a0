// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project/job status codes, persisted as the `_status` property.

use std::fmt;

/// Lifecycle status of a project's current (or most recent) job.
///
/// The numeric values are part of the on-disk property format and must not
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Status {
    Unknown = 0,
    Running = 1,
    Waiting = 2,
    Completed = 3,
    Unevaluated = 4,
    Killed = 5,
    Failed = 6,
}

impl Status {
    /// True for statuses from which no further transition happens without a
    /// fresh `run()`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Completed | Status::Killed | Status::Failed | Status::Unknown
        )
    }

    /// True while a Job is actively polling this project.
    pub fn is_live(self) -> bool {
        matches!(self, Status::Running | Status::Waiting)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Status::Unknown,
            1 => Status::Running,
            2 => Status::Waiting,
            3 => Status::Completed,
            4 => Status::Unevaluated,
            5 => Status::Killed,
            6 => Status::Failed,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Unknown => "Not found",
            Status::Running => "Running",
            Status::Waiting => "Waiting",
            Status::Completed => "Completed",
            Status::Unevaluated => "Unevaluated",
            Status::Killed => "Killed",
            Status::Failed => "Failed",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().ok().and_then(Status::from_code).ok_or(())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
