// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content module
//!
//! Provides fetching, caching, and publishing of the question catalogue:
//! - Categories
//! - Questions, bucketed per category
//! - Aggregate stats
//!
//! Cached content is served on cold start and replaced by successful
//! refresh cycles against the content API.

mod cache;
mod config;
mod fetcher;
mod progress;
mod store;
mod types;

pub(crate) use cache::atomic_write;
pub use cache::{CacheError, ContentCache};
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use fetcher::{ApiClient, ContentSource, FavoritesRemote, FetchError};
pub use progress::{view_progress, ViewProgress};
pub use store::ContentStore;
pub use types::{
    Category, ContentSnapshot, Question, QuestionBuckets, RefreshReport, RefreshTarget, Stats,
};
