// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Job`]: the controller for one in-flight execution (spec §4.F).

use crate::{dummy, rsync};
use regex::Regex;
use sjef_backend::{Backend, DUMMY_NAME};
use sjef_core::error::{Result, SjefError};
use sjef_core::hooks;
use sjef_core::status::Status;
use sjef_properties::PropertyStore;
use sjef_shell::Shell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

const STATUS_KEY: &str = "_status";
const JOBNUMBER_KEY: &str = "jobnumber";
const LITERAL_PID_REGEX: &str = "([0-9]+)";

/// The immutable parameters a [`Job`] is constructed from: a snapshot of
/// the owning project's identity, not a live reference to it (spec §9,
/// "cyclic ownership").
pub struct JobParams {
    /// Directory the job actually executes in: the project directory
    /// itself, or (more usually) a freshly allocated run directory.
    pub run_directory: PathBuf,
    pub stem: String,
    pub suffix: String,
    pub backend: Backend,
    pub properties: Arc<PropertyStore>,
}

/// Process-global kill mutex (spec §5): kill and status observations never
/// interleave, across every Job in the process.
fn kill_mutex() -> &'static AsyncMutex<()> {
    static MUTEX: OnceLock<AsyncMutex<()>> = OnceLock::new();
    MUTEX.get_or_init(|| AsyncMutex::new(()))
}

/// Owns one in-flight execution: launches the backend's `run_command`,
/// keeps the remote mirror synchronized, and polls status until the run
/// reaches a terminal state.
pub struct Job {
    params: JobParams,
    shell: Arc<Shell>,
    killed: Arc<AtomicBool>,
    poll_task: AsyncMutex<Option<(Arc<AtomicBool>, JoinHandle<()>)>>,
}

impl Job {
    /// Opens a [`Shell`] to the backend's host and wraps `params` into a
    /// Job ready for [`Job::run`].
    pub fn new(params: JobParams) -> Result<Self> {
        let shell = Shell::new(params.backend.host.clone(), "/bin/sh")?;
        Ok(Job { params, shell: Arc::new(shell), killed: Arc::new(AtomicBool::new(false)), poll_task: AsyncMutex::new(None) })
    }

    fn remote_cache_directory(&self) -> String {
        crate::cache_dir::remote_cache_directory(&self.params.backend.cache, &self.params.run_directory)
    }

    /// Directory the launch command and status/kill commands execute in:
    /// the run directory itself for a local backend, the remote cache
    /// mirror for a remote one.
    fn execution_directory(&self) -> String {
        if self.params.backend.is_local() {
            self.params.run_directory.to_string_lossy().into_owned()
        } else {
            self.remote_cache_directory()
        }
    }

    fn status(&self) -> Status {
        self.params
            .properties
            .get(STATUS_KEY)
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .and_then(Status::from_code)
            .unwrap_or(Status::Unknown)
    }

    fn set_status(&self, status: Status) -> Result<()> {
        self.params.properties.set(STATUS_KEY, &status.code().to_string()).map_err(Into::into)
    }

    fn job_number(&self) -> u32 {
        self.params.properties.get(JOBNUMBER_KEY).ok().and_then(|s| s.parse().ok()).unwrap_or(0)
    }

    fn set_job_number(&self, n: u32) -> Result<()> {
        self.params.properties.set(JOBNUMBER_KEY, &n.to_string()).map_err(Into::into)
    }

    fn resolve_backend_param(&self, name: &str) -> String {
        self.params
            .properties
            .get(&format!("Backend/{}/{}", self.params.backend.name, name))
            .ok()
            .unwrap_or_default()
    }

    /// spec §4.F `run`: stops any poll task this Job already owns,
    /// transitions through `waiting`, pushes the run directory if remote,
    /// dispatches the launch command (or the builtin `__dummy` routine),
    /// parses the job number, and spawns a fresh poll task.
    #[tracing::instrument(skip(self), fields(stem = %self.params.stem, backend = %self.params.backend.name, wait))]
    pub async fn run(self: &Arc<Self>, wait: bool) -> Result<()> {
        self.stop_poll_task().await;

        let initial_status = self.status();
        self.set_status(Status::Waiting)?;
        self.set_job_number(0)?;

        if self.params.backend.name == DUMMY_NAME {
            dummy::run(&self.params.run_directory, &self.params.stem)?;
            self.set_job_number(1)?;
            self.set_status(Status::Completed)?;
            return Ok(());
        }

        if !self.params.backend.is_local() {
            rsync::push_run_directory(&self.params.backend.host, &self.params.run_directory.to_string_lossy(), &self.remote_cache_directory()).await?;
        }

        let directory = self.execution_directory();
        let out_file = format!("{}.stdout", self.params.stem);
        let err_file = format!("{}.stderr", self.params.stem);
        let command = sjef_backend::expand(&self.params.backend, None, |name| self.resolve_backend_param(name))
            .map_err(|e| SjefError::ConfigError(e.to_string()))?;

        let is_batch = self.params.backend.run_jobnumber != LITERAL_PID_REGEX;
        let wait_for_command = wait || is_batch;

        let (stdout, pid) = self.shell.run(&command, wait_for_command, &directory, &out_file, &err_file).await?;

        let job_number = if self.params.backend.run_jobnumber == LITERAL_PID_REGEX {
            pid
        } else {
            Regex::new(&self.params.backend.run_jobnumber)
                .ok()
                .and_then(|re| re.captures(&stdout))
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        self.set_job_number(job_number)?;

        self.spawn_poll_task(initial_status);
        Ok(())
    }

    /// spec §4.F `get_status`: `unknown` while no job number is recorded,
    /// otherwise the first status-command output line naming the job
    /// number, `running` preferred over `waiting` when both match.
    #[tracing::instrument(skip(self), fields(stem = %self.params.stem))]
    pub async fn get_status(&self) -> Result<Status> {
        let job_number = self.job_number();
        if job_number == 0 {
            return Ok(Status::Unknown);
        }
        let command = format!("{} {}", self.params.backend.status_command, job_number);
        let directory = self.execution_directory();
        let (stdout, _) = self.shell.run(&command, true, &directory, "/dev/null", "/dev/null").await?;

        let waiting_re = Regex::new(&self.params.backend.status_waiting).ok();
        let running_re = Regex::new(&self.params.backend.status_running).ok();
        let needle = job_number.to_string();

        for line in stdout.lines() {
            if !line.split_whitespace().any(|tok| tok == needle) {
                continue;
            }
            let is_running = running_re.as_ref().is_some_and(|re| re.is_match(line));
            let is_waiting = waiting_re.as_ref().is_some_and(|re| re.is_match(line));
            if is_running {
                return Ok(Status::Running);
            }
            if is_waiting {
                return Ok(Status::Waiting);
            }
        }
        Ok(Status::Unknown)
    }

    /// spec §4.F `kill`: under the process-global kill mutex, dispatches
    /// `kill_command`, sets `killed`, and arms the sentinel that forces
    /// the next poll cycle to report `killed` regardless of what the
    /// backend itself says. A second call is a no-op.
    #[tracing::instrument(skip(self), fields(stem = %self.params.stem))]
    pub async fn kill(&self) -> Result<()> {
        let _guard = kill_mutex().lock().await;
        if self.killed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let job_number = self.job_number();
        if job_number != 0 {
            let command = format!("{} {}", self.params.backend.kill_command, job_number);
            let directory = self.execution_directory();
            let _ = self.shell.run(&command, true, &directory, "/dev/null", "/dev/null").await;
        }
        self.set_status(Status::Killed)?;
        Ok(())
    }

    /// Stops this Job's background poll task without touching its status,
    /// for a project superseding it with a fresh Job (spec §4.G `run`).
    pub async fn cancel(&self) {
        self.stop_poll_task().await;
    }

    async fn stop_poll_task(&self) {
        let previous = self.poll_task.lock().await.take();
        if let Some((closing, handle)) = previous {
            closing.store(true, Ordering::SeqCst);
            let _ = handle.await;
        }
    }

    fn spawn_poll_task(self: &Arc<Self>, initial_status: Status) {
        let closing = Arc::new(AtomicBool::new(false));
        let job = Arc::clone(self);
        let task_closing = Arc::clone(&closing);
        let handle = tokio::spawn(async move { job.poll_loop(task_closing, initial_status).await });
        // Spawning happens from within `run`, which already holds no lock on
        // `poll_task`; take the lock synchronously via try_lock since no
        // other task can be racing this one (run() is the sole producer).
        if let Ok(mut slot) = self.poll_task.try_lock() {
            *slot = Some((closing, handle));
        }
    }

    /// spec §4.F `poll_job`: the background convergence loop.
    async fn poll_loop(self: Arc<Self>, closing: Arc<AtomicBool>, initial_status: Status) {
        let mut cycle_time = Duration::from_millis(0);
        loop {
            let cycle_start = Instant::now();
            let _guard = kill_mutex().lock().await;

            let observed = if self.killed.load(Ordering::SeqCst) {
                Status::Killed
            } else {
                match self.get_status().await {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(error = %e, "poll cycle: status observation failed, treating as unknown");
                        Status::Unknown
                    }
                }
            };

            let mapped = if observed == Status::Unknown {
                match initial_status {
                    Status::Killed => Status::Killed,
                    Status::Running | Status::Waiting | Status::Completed => Status::Completed,
                    other => other,
                }
            } else {
                observed
            };

            if !self.params.backend.is_local() {
                let extra_excludes = ["backup", "derived"];
                if let Err(e) = rsync::pull_run_directory(&self.params.backend.host, &self.params.run_directory.to_string_lossy(), &self.remote_cache_directory(), &extra_excludes).await {
                    tracing::warn!(error = %e, "poll cycle: pull failed");
                }
            }

            if let Err(e) = self.set_status(mapped) {
                tracing::warn!(error = %e, "poll cycle: failed to persist status");
            }

            let done = closing.load(Ordering::SeqCst) || mapped.is_terminal() || self.killed.load(Ordering::SeqCst);
            drop(_guard);

            if done {
                self.terminal_cleanup(mapped).await;
                break;
            }

            cycle_time = cycle_start.elapsed();
            let backoff = Duration::from_millis(10) + cycle_time * 2;
            tokio::time::sleep(backoff).await;
        }
    }

    /// Final pull, remote-cache cleanup (only if the manifests agree), and
    /// the customization hook's last word on the project's final status
    /// (spec §4.F, final paragraph).
    async fn terminal_cleanup(&self, mapped: Status) {
        if !self.params.backend.is_local() {
            let remote_dir = self.remote_cache_directory();
            if let Err(e) = rsync::pull_run_directory(&self.params.backend.host, &self.params.run_directory.to_string_lossy(), &remote_dir, &[]).await {
                tracing::warn!(error = %e, "terminal cleanup: final pull failed");
            }
            let local = rsync::local_manifest(&self.params.run_directory);
            match rsync::remote_manifest(&self.params.backend.host, &remote_dir).await {
                Ok(remote) if remote == local => {
                    if let Err(e) = rsync::remove_remote_directory(&self.params.backend.host, &remote_dir).await {
                        tracing::warn!(error = %e, "terminal cleanup: remote cache removal failed");
                    }
                }
                Ok(remote) => {
                    tracing::warn!(?local, ?remote, remote_dir, "terminal cleanup: manifests differ, keeping remote cache for manual recovery");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal cleanup: could not list remote directory, keeping remote cache");
                }
            }
        }

        let xml_path = self.params.run_directory.join(format!("{}.xml", self.params.stem));
        let xml_contents = std::fs::read_to_string(&xml_path).unwrap_or_default();
        let final_status = hooks::for_suffix(&self.params.suffix).status_from_output(&xml_contents).unwrap_or(mapped);
        if let Err(e) = self.set_status(final_status) {
            tracing::warn!(error = %e, "terminal cleanup: failed to persist final status");
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
