// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PropertyStore`: the XML-backed key/value map behind `Info.plist`, with
//! the cache-invalidation and durability protocol from spec §4.C.

use crate::atomic_save;
use crate::error::{PropertyStoreError, Result};
use crate::plist_codec;
use crate::sentinel;
use indexmap::IndexMap;
use sjef_locker::Locker;
use sjef_core::writer_id::WriterId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

pub const PROPERTY_FILE_NAME: &str = "Info.plist";

/// One cache slot: the deserialised map plus the on-disk mtime it was
/// built from.
struct Cache {
    map: IndexMap<String, String>,
    mtime: SystemTime,
}

/// A concurrently-accessed `Info.plist` for one project directory.
///
/// Every mutating call, and every read that might need to reload, takes
/// the shared project `Locker`'s bolt first: this both serialises writers
/// and establishes a happens-before edge so the mtime/sentinel comparison
/// below is meaningful.
pub struct PropertyStore {
    project_dir: PathBuf,
    locker: Arc<Locker>,
    writer_id: WriterId,
    cache: parking_lot::Mutex<Cache>,
}

impl PropertyStore {
    fn property_file(&self) -> PathBuf {
        self.project_dir.join(PROPERTY_FILE_NAME)
    }

    /// Opens the property store for `project_dir`, using `locker` for the
    /// locking discipline. If `Info.plist` does not yet exist, writes a
    /// minimal empty document and returns `created = true`.
    #[tracing::instrument(skip(locker), fields(path = %project_dir.display()))]
    pub fn open(project_dir: impl Into<PathBuf>, locker: Arc<Locker>) -> Result<(Self, bool)> {
        let project_dir = project_dir.into();
        let writer_id = WriterId::fresh();
        let property_file = project_dir.join(PROPERTY_FILE_NAME);

        let _bolt = locker.bolt().map_err(PropertyStoreError::Lock)?;

        let created = !property_file.exists();
        if created {
            std::fs::create_dir_all(&project_dir)
                .map_err(|source| PropertyStoreError::Io { path: project_dir.display().to_string(), source })?;
            atomic_save::write_atomic(&property_file, &plist_codec::encode(&IndexMap::new()))?;
            sentinel::record_writer(&project_dir, writer_id)?;
        }

        let mtime = mtime_of(&property_file)?;
        let contents = std::fs::read_to_string(&property_file)
            .map_err(|source| PropertyStoreError::Io { path: property_file.display().to_string(), source })?;
        let map = plist_codec::decode(&contents)?;

        tracing::debug!(created, properties = map.len(), "property store opened");

        Ok((
            PropertyStore { project_dir, locker, writer_id, cache: parking_lot::Mutex::new(Cache { map, mtime }) },
            created,
        ))
    }

    /// Returns the value for `key`, or `""` if absent.
    pub fn get(&self, key: &str) -> Result<String> {
        let _bolt = self.locker.bolt().map_err(PropertyStoreError::Lock)?;
        self.refresh_if_stale_locked()?;
        let cache = self.cache.lock();
        Ok(cache.map.get(key).cloned().unwrap_or_default())
    }

    /// Returns only the entries present among `keys`.
    pub fn get_many(&self, keys: &[&str]) -> Result<IndexMap<String, String>> {
        let _bolt = self.locker.bolt().map_err(PropertyStoreError::Lock)?;
        self.refresh_if_stale_locked()?;
        let cache = self.cache.lock();
        let mut result = IndexMap::new();
        for key in keys {
            if let Some(v) = cache.map.get(*key) {
                result.insert((*key).to_string(), v.clone());
            }
        }
        Ok(result)
    }

    /// Returns every property name, insertion order.
    pub fn names(&self) -> Result<Vec<String>> {
        let _bolt = self.locker.bolt().map_err(PropertyStoreError::Lock)?;
        self.refresh_if_stale_locked()?;
        let cache = self.cache.lock();
        Ok(cache.map.keys().cloned().collect())
    }

    /// Sets a single key/value pair. Atomic with respect to the whole map.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = IndexMap::new();
        map.insert(key.to_string(), value.to_string());
        self.set_many(&map)
    }

    /// Sets every entry in `updates`, in one atomic whole-map save.
    #[tracing::instrument(skip(self, updates), fields(path = %self.project_dir.display(), count = updates.len()))]
    pub fn set_many(&self, updates: &IndexMap<String, String>) -> Result<()> {
        let _bolt = self.locker.bolt().map_err(PropertyStoreError::Lock)?;
        self.refresh_if_stale_locked()?;
        {
            let mut cache = self.cache.lock();
            for (key, value) in updates {
                cache.map.shift_remove(key);
                cache.map.insert(key.clone(), value.clone());
            }
        }
        self.save_locked()
    }

    /// Removes a single key. No-op if absent.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.delete_many(&[key])
    }

    /// Removes every key in `keys`, in one atomic whole-map save.
    pub fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let _bolt = self.locker.bolt().map_err(PropertyStoreError::Lock)?;
        self.refresh_if_stale_locked()?;
        {
            let mut cache = self.cache.lock();
            for key in keys {
                cache.map.shift_remove(*key);
            }
        }
        self.save_locked()
    }

    /// This instance's writer identity, for callers (e.g. `sjef-project`)
    /// that want to tag other sentinels with the same identity.
    pub fn writer_id(&self) -> WriterId {
        self.writer_id
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    // --- internal ---------------------------------------------------

    /// Implements the cache-invalidation protocol. Must be called while
    /// holding the locker's bolt.
    fn refresh_if_stale_locked(&self) -> Result<()> {
        let property_file = self.property_file();
        let on_disk = mtime_of(&property_file)?;
        let mut cached = self.cache.lock();

        let stale = if cached.mtime == on_disk {
            !sentinel::written_by(&self.project_dir, self.writer_id)
        } else {
            cached.mtime < on_disk
        };

        if stale {
            let contents = std::fs::read_to_string(&property_file)
                .map_err(|source| PropertyStoreError::Io { path: property_file.display().to_string(), source })?;
            cached.map = plist_codec::decode(&contents)?;
            cached.mtime = on_disk;
            tracing::debug!("reloaded property store after detecting a newer writer");
        }
        Ok(())
    }

    /// Serialises the whole map, durably, then tags the sentinel. Must be
    /// called while holding the locker's bolt.
    fn save_locked(&self) -> Result<()> {
        let property_file = self.property_file();
        let encoded = {
            let cache = self.cache.lock();
            plist_codec::encode(&cache.map)
        };
        atomic_save::write_atomic(&property_file, &encoded)?;
        sentinel::record_writer(&self.project_dir, self.writer_id)?;

        let mtime = mtime_of(&property_file)?;
        self.cache.lock().mtime = mtime;
        Ok(())
    }
}

fn mtime_of(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| PropertyStoreError::Io { path: path.display().to_string(), source })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
