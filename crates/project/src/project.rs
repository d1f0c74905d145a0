// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Project`]: the façade binding path utilities, the Locker, the
//! Property Store, the backend registry and the Job Controller into one
//! project-directory lifecycle (spec §4.G).

use crate::{fsutil, hash, recent, run_dir, suffix};
use indexmap::IndexMap;
use sjef_backend::{Backend, DEFAULT_NAME};
use sjef_core::error::{Result, SjefError};
use sjef_core::hooks;
use sjef_core::status::Status;
use sjef_job::{Job, JobParams};
use sjef_locker::Locker;
use sjef_properties::PropertyStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;

const STATUS_KEY: &str = "_status";
const BACKEND_KEY: &str = "backend";
const JOBNUMBER_KEY: &str = "jobnumber";
const RUN_INPUT_HASH_KEY: &str = "run_input_hash";
const PROJECT_HASH_KEY: &str = "project_hash";
const RUN_DIRECTORIES_KEY: &str = "run_directories";
const CURRENT_RUN_KEY: &str = "current_run";
const IMPORTED_KEY: &str = "IMPORTED";

/// The per-suffix file extensions a project's three standing files use.
/// Defaults mirror the original's `inp`/`out`/`xml`.
#[derive(Debug, Clone)]
pub struct Suffixes {
    pub inp: String,
    pub out: String,
    pub xml: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Suffixes { inp: "inp".to_string(), out: "out".to_string(), xml: "xml".to_string() }
    }
}

/// Which standing file `Project::filename` resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Input,
    Output,
    Xml,
    /// An arbitrary `<stem>.<ext>` sibling, e.g. `"stdout"`.
    Custom(String),
}

/// A self-contained on-disk project directory: one input file, its
/// outputs, `Info.plist` bookkeeping, and a history of run directories.
pub struct Project {
    directory: PathBuf,
    suffix: String,
    stem: String,
    suffixes: Suffixes,
    #[allow(dead_code)]
    locker: Arc<Locker>,
    properties: Arc<PropertyStore>,
    backends: parking_lot::Mutex<std::collections::BTreeMap<String, Backend>>,
    current_backend: parking_lot::Mutex<Backend>,
    job: AsyncMutex<Option<Arc<Job>>>,
    record_as_recent: bool,
}

impl Project {
    /// Constructs or opens the project at `filename` (spec §4.G
    /// construction steps 1-8).
    #[tracing::instrument(skip(suffixes), fields(filename))]
    pub async fn open(filename: &str, default_suffix: &str, suffixes: Suffixes, record_as_recent: bool) -> Result<Self> {
        let project_suffix = suffix::resolve(filename, default_suffix)?;
        let directory = sjef_core::path::expand(filename, &project_suffix)?;

        if directory.exists() {
            if !directory.is_dir() {
                return Err(SjefError::ConfigError(format!("{} exists and is not a directory", directory.display())));
            }
        } else {
            std::fs::create_dir_all(&directory)
                .map_err(|e| SjefError::ConfigError(format!("cannot create project directory {}: {e}", directory.display())))?;
        }

        let locker = sjef_locker::locker_for_path(&directory);
        let (properties, created) = PropertyStore::open(directory.as_path(), Arc::clone(&locker))?;
        let properties = Arc::new(properties);
        if created {
            properties.set(STATUS_KEY, &Status::Unevaluated.code().to_string())?;
        }

        let stem = suffix::stem_of(&directory, &project_suffix);
        hooks::for_suffix(&project_suffix).custom_initialisation(&directory, &stem);

        let backends = sjef_backend::load_backend_config(&project_suffix)?;

        let project = Project {
            directory: directory.clone(),
            suffix: project_suffix.clone(),
            stem,
            suffixes,
            locker,
            properties,
            backends: parking_lot::Mutex::new(backends),
            current_backend: parking_lot::Mutex::new(Backend::local()),
            job: AsyncMutex::new(None),
            record_as_recent,
        };

        let backend_name = {
            let v = project.property(BACKEND_KEY)?;
            if v.is_empty() { DEFAULT_NAME.to_string() } else { v }
        };
        project.change_backend(&backend_name, false)?;

        if project.status()?.is_live() {
            let run_directory = project.current_run_directory()?;
            let params = JobParams {
                run_directory,
                stem: project.stem.clone(),
                suffix: project.suffix.clone(),
                backend: project.backend(),
                properties: Arc::clone(&project.properties),
            };
            if let Ok(job) = Job::new(params) {
                if let Ok(Status::Unknown) = job.get_status().await {
                    project.set_property(STATUS_KEY, &Status::Completed.code().to_string())?;
                }
            }
        }

        if record_as_recent {
            recent::edit(&project_suffix, &directory, true)?;
        }

        Ok(project)
    }

    // --- identity -----------------------------------------------------

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn name(&self) -> &str {
        &self.stem
    }

    /// Allocated once on first access and stable across `move()` (spec
    /// §4.G key invariants).
    pub fn project_hash(&self) -> Result<String> {
        let existing = self.property(PROJECT_HASH_KEY)?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        let fresh = hash::fresh_project_hash();
        self.set_property(PROJECT_HASH_KEY, &fresh)?;
        Ok(fresh)
    }

    // --- filenames ------------------------------------------------------

    /// Resolves a standing file, in the project directory (`run = None`)
    /// or inside the run directory selected by `run` (`0` = most recent).
    pub fn filename(&self, kind: FileKind, run: Option<usize>) -> Result<PathBuf> {
        let (dir, stem) = match run {
            None => (self.directory.clone(), self.stem.clone()),
            Some(index) => {
                let stems = self.run_directories()?;
                let selected = run_dir::select(&stems, index)
                    .ok_or_else(|| SjefError::NotFound(format!("run directory at index {index}")))?
                    .clone();
                (run_dir::directory_for(&self.directory, &selected, &self.suffix), selected)
            }
        };
        let ext = match kind {
            FileKind::Input => self.suffixes.inp.clone(),
            FileKind::Output => self.suffixes.out.clone(),
            FileKind::Xml => self.suffixes.xml.clone(),
            FileKind::Custom(ext) => ext,
        };
        Ok(dir.join(format!("{stem}.{ext}")))
    }

    fn current_run_directory(&self) -> Result<PathBuf> {
        let stems = self.run_directories()?;
        if stems.is_empty() {
            return Ok(self.directory.clone());
        }
        let current_run: usize = self.property(CURRENT_RUN_KEY)?.parse().unwrap_or(0);
        let selected = run_dir::select(&stems, current_run).or_else(|| stems.last());
        match selected {
            Some(stem) => Ok(run_dir::directory_for(&self.directory, stem, &self.suffix)),
            None => Ok(self.directory.clone()),
        }
    }

    // --- properties -----------------------------------------------------

    pub fn property(&self, key: &str) -> Result<String> {
        self.properties.get(key).map_err(Into::into)
    }

    pub fn properties(&self, keys: &[&str]) -> Result<IndexMap<String, String>> {
        self.properties.get_many(keys).map_err(Into::into)
    }

    pub fn property_names(&self) -> Result<Vec<String>> {
        self.properties.names().map_err(Into::into)
    }

    pub fn set_property(&self, key: &str, value: &str) -> Result<()> {
        self.properties.set(key, value).map_err(Into::into)
    }

    pub fn set_properties(&self, updates: &IndexMap<String, String>) -> Result<()> {
        self.properties.set_many(updates).map_err(Into::into)
    }

    pub fn delete_property(&self, key: &str) -> Result<()> {
        self.properties.delete(key).map_err(Into::into)
    }

    pub fn delete_properties(&self, keys: &[&str]) -> Result<()> {
        self.properties.delete_many(keys).map_err(Into::into)
    }

    /// The user-imported files recorded under `IMPORTED`/`IMPORT<i>`
    /// (spec §4.G construction step 6, §6 reserved keys).
    pub fn imported_files(&self) -> Result<Vec<String>> {
        let count: usize = self.property(IMPORTED_KEY)?.parse().unwrap_or(0);
        (0..count).map(|i| self.property(&format!("IMPORT{i}"))).collect()
    }

    // --- backends ---------------------------------------------------

    pub fn backend(&self) -> Backend {
        self.current_backend.lock().clone()
    }

    /// Switches the active backend. `force = false` is a no-op when the
    /// requested name is already active (spec §4.G construction step 8).
    pub fn change_backend(&self, name: &str, force: bool) -> Result<()> {
        let backend = {
            let backends = self.backends.lock();
            backends.get(name).cloned().ok_or_else(|| SjefError::NotFound(format!("backend {name:?}")))?
        };
        let mut current = self.current_backend.lock();
        if !force && current.name == name {
            return Ok(());
        }
        *current = backend;
        drop(current);
        self.set_property(BACKEND_KEY, name)
    }

    // --- run directories ----------------------------------------------

    /// The pruned, ascending-by-sequence-number list of run directories
    /// whose backing directory still exists (spec §3, §4.G).
    pub fn run_directories(&self) -> Result<Vec<String>> {
        let raw = self.property(RUN_DIRECTORIES_KEY)?;
        let recorded = run_dir::parse(&raw);
        let mut existing = run_dir::existing(&self.directory, &self.suffix, &recorded);
        run_dir::sort_ascending(&mut existing, &self.stem);
        if existing != recorded {
            self.set_property(RUN_DIRECTORIES_KEY, &run_dir::serialise(&existing))?;
        }
        Ok(existing)
    }

    /// Allocates the next run directory, copies the project into it as a
    /// slave snapshot (no nested `run/`, no property file), and resets the
    /// per-run bookkeeping (spec §4.G `run_directory_new`).
    pub fn run_directory_new(&self) -> Result<String> {
        let existing = self.run_directories()?;
        let n = run_dir::next_sequence_number(&existing, &self.stem);
        let new_stem = format!("{}_{n}", self.stem);

        std::fs::create_dir_all(self.directory.join(run_dir::RUN_SUBDIR))
            .map_err(|e| SjefError::ConfigError(format!("cannot create run/ directory: {e}")))?;
        let dest_dir = run_dir::directory_for(&self.directory, &new_stem, &self.suffix);

        fsutil::copy_tree_excluding(
            &self.directory,
            &dest_dir,
            &[run_dir::RUN_SUBDIR, sjef_properties::PROPERTY_FILE_NAME, sjef_properties::SENTINEL_FILE_NAME],
        )?;
        fsutil::rename_stem_files(&dest_dir, &self.stem, &new_stem)?;

        let mut stems = existing;
        stems.push(new_stem.clone());
        self.set_property(RUN_DIRECTORIES_KEY, &run_dir::serialise(&stems))?;
        self.set_property(JOBNUMBER_KEY, "0")?;
        self.set_property(CURRENT_RUN_KEY, "0")?;
        Ok(new_stem)
    }

    /// Deletes the oldest run directories while more than `keep` remain
    /// (`keep + 1` while the project is live), spec §4.G `clean`.
    pub fn clean(&self, keep_run_directories: usize) -> Result<()> {
        let limit = if self.status()?.is_live() { keep_run_directories + 1 } else { keep_run_directories };
        let mut stems = self.run_directories()?;
        while stems.len() > limit {
            let oldest = stems.remove(0);
            let dir = run_dir::directory_for(&self.directory, &oldest, &self.suffix);
            let _ = std::fs::remove_dir_all(&dir);
        }
        self.set_property(RUN_DIRECTORIES_KEY, &run_dir::serialise(&stems))
    }

    // --- input hash / run_needed ----------------------------------------

    pub fn input_hash(&self) -> Result<u64> {
        Ok(hash::input_hash(&self.filename(FileKind::Input, None)?, &self.suffix))
    }

    /// spec §4.G `run_needed`.
    pub fn run_needed(&self) -> Result<bool> {
        let status = self.status()?;
        if matches!(status, Status::Failed | Status::Killed) {
            return Ok(true);
        }
        if status.is_live() {
            return Ok(false);
        }

        let input_path = self.filename(FileKind::Input, None)?;
        if !input_path.exists() {
            return Ok(false);
        }
        let xml_path = self.filename(FileKind::Xml, None)?;
        if !xml_path.exists() {
            return Ok(true);
        }

        let recorded = self.property(RUN_INPUT_HASH_KEY)?;
        if !recorded.is_empty() {
            let recorded_hash: u64 = recorded.parse().unwrap_or(0);
            return Ok(recorded_hash != self.input_hash()?);
        }

        let live = std::fs::read_to_string(&input_path).unwrap_or_default();
        let xml_contents = std::fs::read_to_string(&xml_path).unwrap_or_default();
        let reconstructed = hooks::for_suffix(&self.suffix).input_from_output(&xml_contents);
        Ok(hash::canonicalise_whitespace(&live) != hash::canonicalise_whitespace(&reconstructed))
    }

    // --- status / xml ----------------------------------------------

    pub fn status(&self) -> Result<Status> {
        let code: i32 = self.property(STATUS_KEY)?.parse().unwrap_or(0);
        Ok(Status::from_code(code).unwrap_or(Status::Unknown))
    }

    /// Human-readable status, with backend name and job number appended
    /// when known (spec §4.G `status_message`, §7).
    pub fn status_message(&self) -> Result<String> {
        let status = self.status()?;
        let jobnumber = self.property(JOBNUMBER_KEY)?;
        let backend_name = self.backend().name;
        if jobnumber.is_empty() || jobnumber == "0" {
            Ok(status.to_string())
        } else {
            Ok(format!("{status} (backend {backend_name}, job {jobnumber})"))
        }
    }

    /// spec §4.G `xml`: the repaired xml of the selected run (or the
    /// current one), never failing on malformed/truncated content.
    pub fn xml(&self, run: Option<usize>) -> Result<String> {
        let path = self.filename(FileKind::Xml, run)?;
        let raw = std::fs::read_to_string(&path).unwrap_or_default();
        Ok(sjef_core::xml_repair::xml_repair(&raw, &[]))
    }

    /// Spins with exponential backoff, capped at `max_micros`, while
    /// status is not terminal (spec §4.G `wait`).
    pub async fn wait(&self, max_micros: u64) -> Result<()> {
        let ceiling = Duration::from_micros(max_micros.max(1));
        let mut delay = Duration::from_micros(1000).min(ceiling);
        loop {
            if self.status()?.is_terminal() {
                return Ok(());
            }
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(ceiling);
        }
    }

    // --- run / kill ----------------------------------------------------

    /// Allocates a fresh run directory, launches it on the (optionally
    /// switched) active backend, and supersedes any Job this project
    /// already owns (spec §4.F `run`, §4.G).
    #[tracing::instrument(skip(self), fields(project = %self.stem, backend_name))]
    pub async fn run(&self, backend_name: Option<&str>, wait: bool) -> Result<()> {
        if let Some(name) = backend_name {
            self.change_backend(name, false)?;
        }

        {
            let previous = self.job.lock().await.clone();
            if let Some(job) = previous {
                job.cancel().await;
            }
        }

        let new_stem = self.run_directory_new()?;
        let run_directory = run_dir::directory_for(&self.directory, &new_stem, &self.suffix);

        let input_hash = hash::input_hash(&run_directory.join(format!("{new_stem}.{}", self.suffixes.inp)), &self.suffix);
        self.set_property(RUN_INPUT_HASH_KEY, &input_hash.to_string())?;

        tracing::debug!(run_directory = %run_directory.display(), "launching run");
        let params = JobParams {
            run_directory,
            stem: new_stem,
            suffix: self.suffix.clone(),
            backend: self.backend(),
            properties: Arc::clone(&self.properties),
        };
        let job = Arc::new(Job::new(params)?);
        *self.job.lock().await = Some(Arc::clone(&job));
        job.run(wait).await
    }

    /// Kills the currently live Job, if any (spec §4.F `kill`).
    #[tracing::instrument(skip(self), fields(project = %self.stem))]
    pub async fn kill(&self) -> Result<()> {
        let job = self.job.lock().await.clone();
        match job {
            Some(job) => job.kill().await,
            None => {
                tracing::debug!("kill requested but no job is live");
                Ok(())
            }
        }
    }

    // --- recent list --------------------------------------------------

    pub fn recent_find(&self) -> Result<usize> {
        recent::find(&self.suffix, &self.directory)
    }

    // --- copy / move / erase --------------------------------------------

    /// Copies the whole project directory to `dest`, opening it as a new
    /// `Project`. Issues a fresh `project_hash` unless `keep_hash` is set
    /// (spec §4.G key invariants, §8 invariant 4).
    pub async fn copy(&self, dest: &str, keep_hash: bool) -> Result<Project> {
        let dest_suffix = suffix::resolve(dest, &self.suffix)?;
        let dest_directory = sjef_core::path::expand(dest, &dest_suffix)?;
        fsutil::copy_tree_excluding(&self.directory, &dest_directory, &[])?;

        let copied = Project::open(&dest_directory.to_string_lossy(), &dest_suffix, self.suffixes.clone(), self.record_as_recent).await?;
        if !keep_hash {
            copied.set_property(PROJECT_HASH_KEY, &hash::fresh_project_hash())?;
        }
        Ok(copied)
    }

    /// Moves the project directory to `dest`, rewriting stem-matching
    /// filenames in place, and reopens it there. `project_hash` is
    /// preserved (spec §4.G key invariants, §8 invariant 4).
    pub async fn move_to(self, dest: &str, force: bool) -> Result<Project> {
        let dest_suffix = suffix::resolve(dest, &self.suffix)?;
        let dest_directory = sjef_core::path::expand(dest, &dest_suffix)?;

        if dest_directory.exists() && !force {
            return Err(SjefError::ConfigError(format!("{} already exists", dest_directory.display())));
        }
        if dest_directory.exists() {
            std::fs::remove_dir_all(&dest_directory)
                .map_err(|e| SjefError::ConfigError(format!("cannot clear destination for move: {e}")))?;
        }

        let old_directory = self.directory.clone();
        let old_suffix = self.suffix.clone();
        let old_stem = self.stem.clone();

        std::fs::rename(&old_directory, &dest_directory).map_err(|e| SjefError::ConfigError(format!("move failed: {e}")))?;

        let new_stem = suffix::stem_of(&dest_directory, &dest_suffix);
        if new_stem != old_stem {
            fsutil::rename_stem_files(&dest_directory, &old_stem, &new_stem)?;
        }
        hooks::for_suffix(&dest_suffix).rewrite_input_file(&dest_directory.join(format!("{new_stem}.{}", self.suffixes.inp)), &old_stem);

        if self.record_as_recent {
            recent::edit(&old_suffix, &old_directory, false)?;
        }

        Project::open(&dest_directory.to_string_lossy(), &dest_suffix, self.suffixes, self.record_as_recent).await
    }

    /// Purges the project directory entirely and drops it from the
    /// recent-projects list (spec §8 invariant 9).
    pub fn erase(self) -> Result<()> {
        if self.record_as_recent {
            recent::edit(&self.suffix, &self.directory, false)?;
        }
        std::fs::remove_dir_all(&self.directory).map_err(|e| SjefError::ConfigError(format!("erase failed: {e}")))
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
