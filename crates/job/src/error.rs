// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Narrow error type for the job controller, converted into
/// `sjef_core::SjefError` at the crate boundary.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("transfer error: {0}")]
    Transfer(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Core(#[from] sjef_core::error::SjefError),
}

impl From<JobError> for sjef_core::error::SjefError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::Core(inner) => inner,
            JobError::Transfer(msg) => sjef_core::error::SjefError::TransferError(msg),
            JobError::Config(msg) => sjef_core::error::SjefError::ConfigError(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
