// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Favorites module
//!
//! Maintains the locally persisted favorite questions, pushes additions
//! and removals to the remote store keyed by a per-install device id, and
//! reconciles the two on startup.

mod device;
mod manager;
mod merge;

pub use device::DeviceId;
pub use manager::FavoritesManager;
pub use merge::merge_favorites;

use thiserror::Error;

use crate::content::{CacheError, FetchError};

/// Errors that can occur with favorites
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local write failed
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote store could not be reached or answered with an error
    #[error("Remote error: {0}")]
    Remote(#[from] FetchError),
}
