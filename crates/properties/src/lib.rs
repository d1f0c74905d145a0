// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The `Info.plist` property store: an XML-backed, order-preserving
//! key/value map with the cache-invalidation and atomic-save discipline
//! required for two writers racing within one filesystem mtime quantum.

mod atomic_save;
pub mod error;
mod plist_codec;
mod sentinel;
mod store;

pub use error::PropertyStoreError;
pub use plist_codec::PlistParseError;
pub use sentinel::SENTINEL_FILE_NAME;
pub use store::{PropertyStore, PROPERTY_FILE_NAME};
