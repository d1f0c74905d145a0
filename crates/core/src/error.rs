// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors surfaced by any layer of the SJEF core.
#[derive(Debug, Error)]
pub enum SjefError {
    /// Unknown project suffix, invalid backend key, malformed backend file,
    /// or invalid run-command template.
    #[error("config error: {0}")]
    ConfigError(String),

    /// The lock file could not be created or opened.
    #[error("lock io error on {path}: {source}")]
    LockIoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Property file load failure or unrecoverable writer collision.
    #[error("property store error: {0}")]
    PropertyStoreError(String),

    /// An archive-sync invocation reported an error marker.
    #[error("transfer error: {0}")]
    TransferError(String),

    /// A synchronous shell command exited non-zero.
    #[error("shell command failed on {host} (exit {exit_code}): {command}")]
    ShellExecError {
        host: String,
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The requested operation has no implementation on this platform/backend.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A project or backend name could not be located.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller-observable cancellation (poll task teardown).
    #[error("interrupted: {0}")]
    Interrupted(String),
}

pub type Result<T> = std::result::Result<T, SjefError>;
