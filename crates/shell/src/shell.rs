// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Shell`]: a persistent local or SSH-tunnelled command session.

use crate::transport::{LocalTransport, RemoteTransport, Transport};
use sjef_core::error::{Result, SjefError};
use std::time::Duration;
use tokio::sync::Mutex;

/// True if `host` is empty or names the local machine.
pub fn host_is_local(host: &str) -> bool {
    host.is_empty() || host == "localhost" || host == "127.0.0.1"
}

/// A persistent command session against one host, local or remote.
///
/// Only one command executes at a time: every call takes the internal
/// mutex first, mirroring the original's `m_run_mutex`.
pub struct Shell {
    host: String,
    transport: Mutex<Box<dyn Transport>>,
}

impl Shell {
    /// Opens a shell session to `host` (empty or `localhost` for a local
    /// session). For a remote host this spawns `ssh host <shell_program>`
    /// immediately and keeps it alive for the life of the `Shell`.
    pub fn new(host: impl Into<String>, shell_program: &str) -> Result<Self> {
        let host = host.into();
        let transport: Box<dyn Transport> = if host_is_local(&host) {
            Box::new(LocalTransport::new(host.clone()))
        } else {
            Box::new(RemoteTransport::spawn(host.clone(), shell_program)?)
        };
        Ok(Shell { host, transport: Mutex::new(transport) })
    }

    /// A local shell session using `/bin/sh`.
    pub fn local() -> Result<Self> {
        Self::new("localhost", "/bin/sh")
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_local(&self) -> bool {
        host_is_local(&self.host)
    }

    /// Runs `command` in `directory`. If `wait` is true the call blocks
    /// until completion and returns captured stdout, failing on a
    /// non-zero exit. If `wait` is false, stdout/stderr are redirected to
    /// `out_file`/`err_file` and the call returns immediately with the
    /// backgrounded child's PID as the returned job number.
    #[tracing::instrument(skip(self, command), fields(host = %self.host, directory, wait))]
    pub async fn run(&self, command: &str, wait: bool, directory: &str, out_file: &str, err_file: &str) -> Result<(String, u32)> {
        let mut transport = self.transport.lock().await;
        let outcome = transport.run(command, wait, directory, out_file, err_file).await?;
        Ok((outcome.stdout, outcome.job_number))
    }

    /// Reports whether `job_number` is still alive.
    pub async fn running(&self, job_number: u32) -> Result<bool> {
        if job_number == 0 {
            return Ok(false);
        }
        let mut transport = self.transport.lock().await;
        transport.is_running(job_number).await
    }

    /// Polls [`Self::running`] with exponential backoff, doubling the
    /// wait each cycle up to `max_wait`, starting from `min_wait`.
    pub async fn wait(&self, job_number: u32, min_wait: Duration, max_wait: Duration) -> Result<()> {
        let max_wait = if max_wait.is_zero() { min_wait } else { max_wait };
        let mut delay = min_wait;
        while self.running(job_number).await? {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(max_wait).max(if min_wait.is_zero() { Duration::from_millis(1) } else { min_wait });
        }
        Ok(())
    }
}

/// Reports [`SjefError::UnsupportedOperation`] for asynchronous execution
/// on platforms without a `nohup ... &`-style backgrounding primitive
/// (native Windows). Not reachable on the Unix targets this crate
/// actually runs `sh -c` on, but kept as an explicit guard for callers
/// that branch on platform before invoking [`Shell::run`].
pub fn require_async_supported() -> Result<()> {
    if cfg!(windows) {
        return Err(SjefError::UnsupportedOperation("asynchronous execution is not supported on this platform".into()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
