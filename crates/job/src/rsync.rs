// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin wrapper over the external `rsync` binary for pushing a run
//! directory to a backend's remote cache and pulling it back.
//!
//! Grounded on spec §4.F/§6: `rsync --archive --copy-links --timeout=5
//! --protect-args`, with a `TransferError` raised whenever stderr contains
//! the literal marker `rsync error:`.

use sjef_core::error::{Result, SjefError};
use tokio::process::Command;

/// Direction of one sync: local source copied to remote destination, or
/// vice versa.
pub enum Direction {
    Push,
    Pull,
}

/// Runs one `rsync` invocation between `local_dir` and `<host>:<remote_dir>`.
/// `excludes` are rendered as `--exclude=<pattern>` flags.
#[tracing::instrument(skip(excludes), fields(host, local_dir, remote_dir))]
pub async fn sync(direction: Direction, host: &str, local_dir: &str, remote_dir: &str, excludes: &[&str]) -> Result<()> {
    let remote = format!("{host}:{remote_dir}/");
    let local = format!("{}/", local_dir.trim_end_matches('/'));

    let (source, dest) = match direction {
        Direction::Push => (local, remote),
        Direction::Pull => (remote, local),
    };

    let mut command = Command::new("rsync");
    command.arg("--archive").arg("--copy-links").arg("--timeout=5").arg("--protect-args");
    for pattern in excludes {
        command.arg(format!("--exclude={pattern}"));
    }
    command.arg(&source).arg(&dest);

    tracing::debug!("rsync dispatch");
    let output = command
        .output()
        .await
        .map_err(|e| SjefError::TransferError(format!("failed to spawn rsync: {e}")))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("rsync error:") {
        return Err(SjefError::TransferError(stderr.into_owned()));
    }
    if !output.status.success() {
        return Err(SjefError::TransferError(format!(
            "rsync exited with {}: {}",
            output.status.code().unwrap_or(-1),
            stderr
        )));
    }
    Ok(())
}

/// Pushes `local_dir` to `<host>:<remote_dir>`, excluding the property file
/// and writer sentinel (spec §4.F step 3), retrying once unconditionally
/// after the first failure (the original's "settling" retry for a cache
/// directory that may not exist yet on the first attempt).
pub async fn push_run_directory(host: &str, local_dir: &str, remote_dir: &str) -> Result<()> {
    let excludes = ["Info.plist", ".Info.plist.writing_object"];
    match sync(Direction::Push, host, local_dir, remote_dir, &excludes).await {
        Ok(()) => Ok(()),
        Err(_) => sync(Direction::Push, host, local_dir, remote_dir, &excludes).await,
    }
}

/// Pulls `<host>:<remote_dir>` back to `local_dir`, excluding the property
/// file and any backup/derived subtrees named in `extra_excludes` (spec
/// §4.F step "poll_job", which pulls without the property file or the
/// backup subtree).
pub async fn pull_run_directory(host: &str, local_dir: &str, remote_dir: &str, extra_excludes: &[&str]) -> Result<()> {
    let mut excludes = vec!["Info.plist", ".Info.plist.writing_object"];
    excludes.extend_from_slice(extra_excludes);
    sync(Direction::Pull, host, local_dir, remote_dir, &excludes).await
}

/// Lists the relative paths under `dir`, for the terminal-cleanup manifest
/// comparison (spec §4.F), ignoring `Info.plist` and the writer sentinel.
pub fn local_manifest(dir: &std::path::Path) -> Vec<String> {
    let mut entries = Vec::new();
    collect(dir, dir, &mut entries);
    entries.sort();
    entries
}

fn collect(root: &std::path::Path, dir: &std::path::Path, out: &mut Vec<String>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else { return };
    for entry in read_dir.flatten() {
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(root) else { continue };
        let rel = rel.to_string_lossy().into_owned();
        if rel == "Info.plist" || rel == ".Info.plist.writing_object" {
            continue;
        }
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            out.push(rel);
        }
    }
}

/// Lists the relative paths under `<host>:<remote_dir>` via a single `ssh
/// find` invocation, for the same manifest comparison.
pub async fn remote_manifest(host: &str, remote_dir: &str) -> Result<Vec<String>> {
    let output = Command::new("ssh")
        .arg(host)
        .arg(format!("cd '{remote_dir}' 2>/dev/null && find . -type f"))
        .output()
        .await
        .map_err(|e| SjefError::TransferError(format!("failed to list remote directory: {e}")))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut entries: Vec<String> = stdout
        .lines()
        .map(|l| l.trim_start_matches("./").to_string())
        .filter(|l| !l.is_empty() && l != "Info.plist" && l != ".Info.plist.writing_object")
        .collect();
    entries.sort();
    Ok(entries)
}

/// Removes the remote cache directory entirely, via `ssh host rm -rf`.
pub async fn remove_remote_directory(host: &str, remote_dir: &str) -> Result<()> {
    if remote_dir.is_empty() || remote_dir == "/" {
        return Err(SjefError::TransferError("refusing to remove an empty or root remote path".into()));
    }
    let output = Command::new("ssh")
        .arg(host)
        .arg(format!("rm -rf '{remote_dir}'"))
        .output()
        .await
        .map_err(|e| SjefError::TransferError(format!("failed to remove remote directory: {e}")))?;
    if !output.status.success() {
        return Err(SjefError::TransferError(format!(
            "remote cleanup failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "rsync_tests.rs"]
mod tests;
