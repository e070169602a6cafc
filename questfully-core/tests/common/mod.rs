// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! In-memory stand-ins for the content API and fixtures shared across
//! test targets.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use questfully_core::{Category, ContentSource, FavoritesRemote, FetchError, Question, Stats};

pub fn category(id: &str) -> Category {
    Category {
        id: id.to_string(),
        name: format!("Category {}", id),
        color_tag: "blue".to_string(),
    }
}

pub fn question(id: &str, category_id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {}?", id),
        category_id: category_id.to_string(),
    }
}

pub fn stats(total_questions: u64, per_category: &[(&str, u64)]) -> Stats {
    Stats {
        total_questions,
        total_categories: per_category.len() as u64,
        questions_per_category: per_category
            .iter()
            .map(|(id, n)| (id.to_string(), *n))
            .collect(),
    }
}

pub fn server_error() -> FetchError {
    FetchError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

/// Content source backed by in-memory data
///
/// `None` entries fail with a 500. Question fetches can be held back with
/// [`MockContentSource::gate_questions`].
#[derive(Default)]
pub struct MockContentSource {
    categories: Mutex<Option<Vec<Category>>>,
    questions: Mutex<HashMap<String, Option<Vec<Question>>>>,
    stats: Mutex<Option<Stats>>,
    question_gate: Mutex<Option<Arc<Semaphore>>>,
    pub category_calls: AtomicUsize,
    pub question_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_categories(&self, categories: Option<Vec<Category>>) {
        *self.categories.lock() = categories;
    }

    pub fn set_questions(&self, category_id: &str, questions: Option<Vec<Question>>) {
        self.questions
            .lock()
            .insert(category_id.to_string(), questions);
    }

    pub fn set_stats(&self, stats: Option<Stats>) {
        *self.stats.lock() = stats;
    }

    /// Make question fetches wait for a permit on the returned semaphore
    pub fn gate_questions(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.question_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.category_calls.load(Ordering::SeqCst),
            self.question_calls.load(Ordering::SeqCst),
            self.stats_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.categories.lock().clone().ok_or_else(server_error)
    }

    async fn fetch_questions(&self, category_id: &str) -> Result<Vec<Question>, FetchError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.question_gate.lock().clone();
        if let Some(gate) = gate {
            let permit = gate.acquire().await.map_err(|_| server_error())?;
            permit.forget();
        }
        self.questions
            .lock()
            .get(category_id)
            .cloned()
            .flatten()
            .ok_or_else(server_error)
    }

    async fn fetch_stats(&self) -> Result<Stats, FetchError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.lock().clone().ok_or_else(server_error)
    }
}

/// Favorites remote backed by an in-memory list
#[derive(Default)]
pub struct MockFavoritesRemote {
    remote: Mutex<Option<Vec<Question>>>,
    fail_pushes: AtomicBool,
    pub added: Mutex<Vec<(String, String)>>,
    pub removed: Mutex<Vec<(String, String)>>,
    pub fetched_for: Mutex<Vec<String>>,
}

impl MockFavoritesRemote {
    pub fn new(remote: Vec<Question>) -> Self {
        Self {
            remote: Mutex::new(Some(remote)),
            ..Default::default()
        }
    }

    pub fn set_remote(&self, remote: Option<Vec<Question>>) {
        *self.remote.lock() = remote;
    }

    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FavoritesRemote for MockFavoritesRemote {
    async fn fetch_favorites(&self, device_id: &str) -> Result<Vec<Question>, FetchError> {
        self.fetched_for.lock().push(device_id.to_string());
        self.remote.lock().clone().ok_or_else(server_error)
    }

    async fn add_favorite(&self, device_id: &str, question_id: &str) -> Result<(), FetchError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.added
            .lock()
            .push((device_id.to_string(), question_id.to_string()));
        Ok(())
    }

    async fn remove_favorite(
        &self,
        device_id: &str,
        question_id: &str,
    ) -> Result<(), FetchError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.removed
            .lock()
            .push((device_id.to_string(), question_id.to_string()));
        Ok(())
    }
}
