// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content cache for storing fetched content locally
//!
//! The cache keeps the last known good categories, question buckets and
//! stats as three JSON documents in a `content/` directory. Writes are
//! atomic (temp file, then rename) so a crash never corrupts the previous
//! copy.
//!
//! All file access for one cache instance runs on a single worker thread
//! in submission order. Saves are fire-and-forget; loads block until the
//! worker has answered. The cache is advisory: any read or parse failure
//! degrades to "empty" and any write failure is logged and dropped.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{Category, Question, QuestionBuckets, Stats};

const CATEGORIES_FILE: &str = "categories.json";
const QUESTIONS_FILE: &str = "questions.json";
const STATS_FILE: &str = "stats.json";

/// On-disk shape of the questions document
#[derive(Debug, Serialize, Deserialize)]
struct CachedQuestions {
    items: Vec<CachedBucket>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedBucket {
    category_id: String,
    questions: Vec<Question>,
}

impl From<&QuestionBuckets> for CachedQuestions {
    fn from(buckets: &QuestionBuckets) -> Self {
        let items = buckets
            .iter()
            .map(|(category_id, questions)| CachedBucket {
                category_id: category_id.clone(),
                questions: questions.clone(),
            })
            .collect();
        Self { items }
    }
}

impl From<CachedQuestions> for QuestionBuckets {
    fn from(cached: CachedQuestions) -> Self {
        cached
            .items
            .into_iter()
            .map(|bucket| (bucket.category_id, bucket.questions))
            .collect()
    }
}

enum CacheJob {
    Read {
        file: &'static str,
        reply: Sender<Option<Vec<u8>>>,
    },
    Write {
        file: &'static str,
        data: Vec<u8>,
    },
    Clear {
        reply: Sender<()>,
    },
    Flush {
        reply: Sender<()>,
    },
}

/// Local cache for fetched content
pub struct ContentCache {
    cache_dir: PathBuf,
    jobs: Option<Sender<CacheJob>>,
    worker: Option<JoinHandle<()>>,
}

impl ContentCache {
    /// Create a new content cache at the given storage path
    ///
    /// Creates a `content/` subdirectory if it doesn't exist and starts
    /// the cache worker.
    pub fn new(storage_path: &Path) -> Result<Self, CacheError> {
        let cache_dir = storage_path.join("content");
        fs::create_dir_all(&cache_dir)?;

        let (tx, rx) = mpsc::channel::<CacheJob>();
        let dir = cache_dir.clone();
        let worker = std::thread::Builder::new()
            .name("questfully-cache".to_string())
            .spawn(move || {
                for job in rx {
                    run_job(&dir, job);
                }
            })?;

        Ok(Self {
            cache_dir,
            jobs: Some(tx),
            worker: Some(worker),
        })
    }

    /// Directory holding the cached documents
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Load cached categories, empty if absent or corrupt
    pub fn load_categories(&self) -> Vec<Category> {
        self.read_json(CATEGORIES_FILE).unwrap_or_default()
    }

    /// Load cached question buckets, empty if absent or corrupt
    pub fn load_questions(&self) -> QuestionBuckets {
        self.read_json::<CachedQuestions>(QUESTIONS_FILE)
            .map(QuestionBuckets::from)
            .unwrap_or_default()
    }

    /// Load cached stats, `None` if absent or corrupt
    pub fn load_stats(&self) -> Option<Stats> {
        self.read_json(STATS_FILE)
    }

    /// Queue a write of the category list
    pub fn save_categories(&self, categories: &[Category]) {
        self.write_json(CATEGORIES_FILE, categories);
    }

    /// Queue a write of the question buckets
    pub fn save_questions(&self, questions: &QuestionBuckets) {
        self.write_json(QUESTIONS_FILE, &CachedQuestions::from(questions));
    }

    /// Queue a write of the stats
    pub fn save_stats(&self, stats: &Stats) {
        self.write_json(STATS_FILE, stats);
    }

    /// Remove every cached document
    pub fn clear(&self) {
        let (reply, done) = mpsc::channel();
        if self.submit(CacheJob::Clear { reply }) {
            let _ = done.recv();
        }
    }

    /// Block until every previously queued write has landed
    pub fn flush(&self) {
        let (reply, done) = mpsc::channel();
        if self.submit(CacheJob::Flush { reply }) {
            let _ = done.recv();
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file: &'static str) -> Option<T> {
        let (reply, answer) = mpsc::channel();
        if !self.submit(CacheJob::Read { file, reply }) {
            return None;
        }
        let data = answer.recv().ok().flatten()?;
        match serde_json::from_slice(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding corrupt cache file {}: {}", file, e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &'static str, value: &T) {
        match serde_json::to_vec_pretty(value) {
            Ok(data) => {
                self.submit(CacheJob::Write { file, data });
            }
            Err(e) => warn!("Failed to encode {} for cache: {}", file, e),
        }
    }

    fn submit(&self, job: CacheJob) -> bool {
        let Some(jobs) = &self.jobs else {
            return false;
        };
        if jobs.send(job).is_err() {
            warn!("Cache worker is gone, dropping job");
            return false;
        }
        true
    }
}

impl Drop for ContentCache {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain queued writes and exit
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_job(dir: &Path, job: CacheJob) {
    match job {
        CacheJob::Read { file, reply } => {
            let path = dir.join(file);
            let data = match fs::read(&path) {
                Ok(data) => Some(data),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("No cached {}", file);
                    None
                }
                Err(e) => {
                    warn!("Failed to read cache file {}: {}", file, e);
                    None
                }
            };
            let _ = reply.send(data);
        }
        CacheJob::Write { file, data } => {
            if let Err(e) = atomic_write(&dir.join(file), &data) {
                warn!("Failed to save {} to cache: {}", file, e);
            }
        }
        CacheJob::Clear { reply } => {
            for file in [CATEGORIES_FILE, QUESTIONS_FILE, STATS_FILE] {
                match fs::remove_file(dir.join(file)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => warn!("Failed to remove cache file {}: {}", file, e),
                }
            }
            let _ = reply.send(());
        }
        CacheJob::Flush { reply } => {
            let _ = reply.send(());
        }
    }
}

/// Atomic file write (write to temp, then rename)
///
/// This ensures that the file is never in a partial state - either the
/// old content remains or the new content is fully written. The temp file
/// is synced to disk before the rename.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<(), CacheError> {
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Errors that can occur with the content cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
