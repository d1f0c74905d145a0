// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Narrow error type for the backend registry, converted into
/// `sjef_core::SjefError::ConfigError` at the crate boundary.
#[derive(Debug, Error)]
pub enum BackendConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed backend XML: {0}")]
    Xml(String),

    #[error("malformed backend YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Template(#[from] crate::template::TemplateError),

    #[error("unknown backend {0:?}")]
    UnknownBackend(String),

    #[error("{0}")]
    Core(#[from] sjef_core::error::SjefError),
}

impl From<BackendConfigError> for sjef_core::error::SjefError {
    fn from(e: BackendConfigError) -> Self {
        match e {
            BackendConfigError::Core(inner) => inner,
            BackendConfigError::UnknownBackend(name) => sjef_core::error::SjefError::NotFound(name),
            other => sjef_core::error::SjefError::ConfigError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendConfigError>;
