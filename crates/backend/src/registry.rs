// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load, merge and synchronize the backend configuration files for one
//! project suffix.

use crate::backend::{Backend, DEFAULT_NAME};
use crate::error::Result;
use crate::{xml_codec, yaml_codec};
use sjef_core::config::{self, BackendFileFormat};
use std::collections::BTreeMap;
use std::path::Path;

fn read_file(path: &Path, format: BackendFileFormat) -> Result<BTreeMap<String, Backend>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(crate::error::BackendConfigError::Io { path: path.display().to_string(), source })
        }
    };
    match format {
        BackendFileFormat::Xml => xml_codec::decode(&contents),
        BackendFileFormat::Yaml => yaml_codec::decode(&contents),
    }
}

fn write_file(path: &Path, backends: &BTreeMap<String, Backend>, format: BackendFileFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| crate::error::BackendConfigError::Io { path: parent.display().to_string(), source })?;
        let locker = sjef_locker::locker_for_path(parent);
        let _bolt = locker.bolt()?;
        let mut backends = backends.clone();
        backends.entry(DEFAULT_NAME.to_string()).or_insert_with(Backend::local);
        let encoded = match format {
            BackendFileFormat::Xml => xml_codec::encode(&backends),
            BackendFileFormat::Yaml => yaml_codec::encode(&backends),
        };
        std::fs::write(path, encoded)
            .map_err(|source| crate::error::BackendConfigError::Io { path: path.display().to_string(), source })?;
    }
    Ok(())
}

/// Reads the per-user backend config file for `suffix`, in `format`. Does
/// not consult the site-wide location.
pub fn read_backend_config_file(suffix: &str, format: BackendFileFormat) -> Result<BTreeMap<String, Backend>> {
    let path = config::backend_config_file_path(suffix, format)?;
    read_file(&path, format)
}

/// Writes the per-user backend config file for `suffix`, in `format`,
/// under that directory's `Locker`. Ensures an entry named `local` is
/// always present.
pub fn write_backend_config_file(backends: &BTreeMap<String, Backend>, suffix: &str, format: BackendFileFormat) -> Result<()> {
    let path = config::backend_config_file_path(suffix, format)?;
    write_file(&path, backends, format)
}

/// The site-wide backend config file for `suffix`, in `format`, if a site
/// configuration root is configured. Read-only from this crate's
/// perspective: `sync_backend_config_file` never writes here.
pub fn read_site_backend_config_file(suffix: &str, format: BackendFileFormat) -> Result<BTreeMap<String, Backend>> {
    match config::site_backend_config_file_path(suffix, format)? {
        Some(path) => read_file(&path, format),
        None => Ok(BTreeMap::new()),
    }
}

/// Ensures the per-user `local` backend exists on disk, synthesising one
/// from [`Backend::local`] if absent.
pub fn ensure_local_backend(suffix: &str) -> Result<()> {
    let format = config::preferred_backend_format();
    let mut backends = read_backend_config_file(suffix, format)?;
    if !backends.contains_key(DEFAULT_NAME) {
        backends.insert(DEFAULT_NAME.to_string(), Backend::local());
        write_backend_config_file(&backends, suffix, format)?;
    }
    Ok(())
}

/// Reconciles the per-user XML and YAML backend config files: if both
/// exist and agree, this is a no-op. Otherwise the newer file is
/// re-emitted in the older format. Returns the format written to, if any.
pub fn sync_backend_config_file(suffix: &str) -> Result<Option<BackendFileFormat>> {
    let preferred = config::preferred_backend_format();
    let unpreferred = preferred.other();

    let preferred_path = config::backend_config_file_path(suffix, preferred)?;
    let unpreferred_path = config::backend_config_file_path(suffix, unpreferred)?;

    if read_backend_config_file(suffix, preferred)? == read_backend_config_file(suffix, unpreferred)? {
        return Ok(None);
    }

    let preferred_exists = preferred_path.exists();
    let unpreferred_exists = unpreferred_path.exists();

    let preferred_is_newer = preferred_exists
        && unpreferred_exists
        && mtime(&unpreferred_path)? < mtime(&preferred_path)?;

    if !unpreferred_exists || preferred_is_newer {
        let backends = read_backend_config_file(suffix, preferred)?;
        write_backend_config_file(&backends, suffix, unpreferred)?;
        return Ok(Some(unpreferred));
    }

    let backends = read_backend_config_file(suffix, unpreferred)?;
    write_backend_config_file(&backends, suffix, preferred)?;
    Ok(Some(preferred))
}

fn mtime(path: &Path) -> Result<std::time::SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| crate::error::BackendConfigError::Io { path: path.display().to_string(), source })
}

/// Loads the full backend registry for `suffix`: site-wide definitions,
/// overridden entry-by-entry by per-user definitions, with `local`
/// guaranteed present and the in-memory `__dummy` backend always added.
///
/// Mirrors and extends the original's `load_backend_config`, which syncs
/// the per-user XML/YAML files, ensures `local` exists, and re-syncs.
pub fn load_backend_config(suffix: &str) -> Result<BTreeMap<String, Backend>> {
    sync_backend_config_file(suffix)?;
    ensure_local_backend(suffix)?;
    sync_backend_config_file(suffix)?;

    let preferred = config::preferred_backend_format();
    let mut result = read_site_backend_config_file(suffix, preferred)?;
    let user = read_backend_config_file(suffix, preferred)?;
    for (name, backend) in user {
        result.insert(name, backend);
    }
    result.entry(DEFAULT_NAME.to_string()).or_insert_with(Backend::local);
    let dummy = Backend::dummy();
    result.insert(dummy.name.clone(), dummy);
    Ok(result)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
