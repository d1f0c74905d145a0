// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local and SSH-tunnelled command transports behind [`crate::Shell`].
//!
//! Both transports speak the same bracketed terminator protocol for the
//! remote/synchronous case, and the same "background, echo the PID"
//! trick for the asynchronous case, grounded on the original `Shell`
//! class. A local transport does the former with a single subprocess
//! call per command; the remote transport keeps one persistent `ssh`
//! child alive and writes/reads lines against its piped stdio.

use async_trait::async_trait;
use regex::Regex;
use sjef_core::error::{Result, SjefError};
use std::sync::OnceLock;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

pub const JOBNUMBER_TAG: &str = "@@@JOBNUMBER";
pub const TERMINATOR: &str = "@@@EOF";

/// The outcome of one command dispatched through a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub stdout: String,
    pub job_number: u32,
}

fn jobnumber_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("{}\\s*(\\d+)", regex::escape(JOBNUMBER_TAG))).unwrap_or_else(|_| Regex::new("$^").unwrap()))
}

/// Wraps `command` so that, when run asynchronously, it backgrounds
/// itself, redirects stdout/stderr to `out_file`/`err_file`, and echoes
/// its child PID tagged with [`JOBNUMBER_TAG`] to stderr.
fn async_pipeline(command: &str, out_file: &str, err_file: &str) -> String {
    format!("(( {command} >{out_file} 2>{err_file}) & echo {JOBNUMBER_TAG} $! 1>&2)")
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn run(&mut self, command: &str, wait: bool, directory: &str, out_file: &str, err_file: &str) -> Result<RunOutcome>;
    async fn is_running(&mut self, job_number: u32) -> Result<bool>;
}

/// Runs commands as direct subprocesses on the local machine.
pub struct LocalTransport {
    host: String,
}

impl LocalTransport {
    pub fn new(host: impl Into<String>) -> Self {
        LocalTransport { host: host.into() }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn run(&mut self, command: &str, wait: bool, directory: &str, out_file: &str, err_file: &str) -> Result<RunOutcome> {
        let pipeline = if wait { command.to_string() } else { async_pipeline(command, out_file, err_file) };
        tracing::debug!(host = %self.host, directory, wait, "running local command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&pipeline)
            .current_dir(directory)
            .output()
            .await
            .map_err(|e| SjefError::ShellExecError {
                host: self.host.clone(),
                command: command.to_string(),
                exit_code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        while stdout.ends_with('\n') {
            stdout.pop();
        }
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let job_number = jobnumber_regex().captures(&stderr).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);

        if wait && !output.status.success() {
            return Err(SjefError::ShellExecError {
                host: self.host.clone(),
                command: command.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                stdout,
                stderr,
            });
        }
        Ok(RunOutcome { stdout, job_number })
    }

    async fn is_running(&mut self, job_number: u32) -> Result<bool> {
        let status = Command::new("ps")
            .arg("-p")
            .arg(job_number.to_string())
            .output()
            .await
            .map_err(|e| SjefError::ShellExecError {
                host: self.host.clone(),
                command: format!("ps -p {job_number}"),
                exit_code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;
        Ok(status.status.success())
    }
}

/// Keeps one persistent `ssh host <shell>` child alive and speaks the
/// bracketed-terminator protocol against its piped stdio.
pub struct RemoteTransport {
    host: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: BufReader<ChildStderr>,
}

impl RemoteTransport {
    pub fn spawn(host: impl Into<String>, shell_program: &str) -> Result<Self> {
        let host = host.into();
        let mut child = Command::new("ssh")
            .arg(&host)
            .arg(shell_program)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| SjefError::ShellExecError {
                host: host.clone(),
                command: format!("ssh {host} {shell_program}"),
                exit_code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;
        let stdin = child.stdin.take().ok_or_else(|| SjefError::ShellExecError {
            host: host.clone(),
            command: "ssh".to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: "no stdin pipe".to_string(),
        })?;
        let stdout = BufReader::new(child.stdout.take().ok_or_else(|| SjefError::ShellExecError {
            host: host.clone(),
            command: "ssh".to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: "no stdout pipe".to_string(),
        })?);
        let stderr = BufReader::new(child.stderr.take().ok_or_else(|| SjefError::ShellExecError {
            host: host.clone(),
            command: "ssh".to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: "no stderr pipe".to_string(),
        })?);
        Ok(RemoteTransport { host, child, stdin, stdout, stderr })
    }
}

#[async_trait]
impl Transport for RemoteTransport {
    async fn run(&mut self, command: &str, wait: bool, directory: &str, out_file: &str, err_file: &str) -> Result<RunOutcome> {
        let pipeline = if wait { command.to_string() } else { async_pipeline(command, out_file, err_file) };
        let script = format!("cd '{directory}'\n{pipeline}\n>&2 echo '{TERMINATOR}' $?\necho '{TERMINATOR}'\n");
        tracing::debug!(host = %self.host, directory, wait, "running remote command");

        let io_err = |e: std::io::Error| SjefError::ShellExecError {
            host: self.host.clone(),
            command: command.to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: e.to_string(),
        };

        self.stdin.write_all(script.as_bytes()).await.map_err(io_err)?;
        self.stdin.flush().await.map_err(io_err)?;

        let mut stdout_text = String::new();
        loop {
            let mut line = String::new();
            let n = self.stdout.read_line(&mut line).await.map_err(io_err)?;
            if n == 0 || line.trim_end_matches(['\n', '\r']) == TERMINATOR {
                break;
            }
            stdout_text.push_str(&line);
        }
        while stdout_text.ends_with('\n') {
            stdout_text.pop();
        }

        let mut stderr_text = String::new();
        let mut job_number = 0;
        let mut exit_code = 0i32;
        loop {
            let mut line = String::new();
            let n = self.stderr.read_line(&mut line).await.map_err(io_err)?;
            if n == 0 {
                break;
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed.starts_with(TERMINATOR) {
                exit_code = trimmed[TERMINATOR.len()..].trim().parse().unwrap_or(-1);
                break;
            }
            if let Some(caps) = jobnumber_regex().captures(trimmed) {
                if let Some(m) = caps.get(1) {
                    job_number = m.as_str().parse().unwrap_or(0);
                }
            } else {
                stderr_text.push_str(trimmed);
                stderr_text.push('\n');
            }
        }

        if wait && exit_code != 0 {
            return Err(SjefError::ShellExecError {
                host: self.host.clone(),
                command: command.to_string(),
                exit_code,
                stdout: stdout_text,
                stderr: stderr_text,
            });
        }
        Ok(RunOutcome { stdout: stdout_text, job_number })
    }

    async fn is_running(&mut self, job_number: u32) -> Result<bool> {
        let outcome = self.run(&format!("ps -p {job_number} > /dev/null 2>/dev/null; echo $?"), true, ".", "/dev/null", "/dev/null").await?;
        Ok(outcome.stdout.trim() == "0")
    }
}

impl Drop for RemoteTransport {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
