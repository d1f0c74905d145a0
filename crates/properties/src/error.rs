// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Narrow error type for the property store, converted into
/// `sjef_core::SjefError::PropertyStoreError` at the crate boundary.
#[derive(Debug, Error)]
pub enum PropertyStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Malformed(#[from] crate::plist_codec::PlistParseError),

    #[error("lock error: {0}")]
    Lock(#[from] sjef_core::error::SjefError),
}

impl From<PropertyStoreError> for sjef_core::error::SjefError {
    fn from(e: PropertyStoreError) -> Self {
        match e {
            PropertyStoreError::Lock(inner) => inner,
            other => sjef_core::error::SjefError::PropertyStoreError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PropertyStoreError>;
