// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content type definitions
//!
//! These types mirror the JSON payloads served by the content API and
//! the documents written to the local cache.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A question category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque category identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Color tag used by clients to theme the category
    #[serde(rename = "color")]
    pub color_tag: String,
}

/// A single conversation question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Opaque question identifier
    pub id: String,
    /// Question text
    pub text: String,
    /// Category the question belongs to
    pub category_id: String,
}

impl Question {
    /// Returns this question re-homed under `category_id`.
    ///
    /// The server is trusted for bucket membership, not for the embedded
    /// field, so fetched questions are normalized through this.
    pub fn in_category(self, category_id: &str) -> Self {
        if self.category_id == category_id {
            return self;
        }
        Self {
            category_id: category_id.to_string(),
            ..self
        }
    }
}

/// Questions grouped by category id
pub type QuestionBuckets = BTreeMap<String, Vec<Question>>;

/// Aggregate content statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Total questions across all categories
    pub total_questions: u64,
    /// Number of categories
    pub total_categories: u64,
    /// Question count per category id
    pub questions_per_category: HashMap<String, u64>,
}

/// Snapshot of everything the content store publishes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSnapshot {
    /// Category list in server order
    pub categories: Vec<Category>,
    /// Question buckets keyed by category id
    pub questions: QuestionBuckets,
    /// Latest stats, if any were ever fetched
    pub stats: Option<Stats>,
}

impl ContentSnapshot {
    /// Questions for a category, empty when the category is unknown
    pub fn questions_for(&self, category_id: &str) -> &[Question] {
        self.questions
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of questions held across all buckets
    pub fn loaded_question_count(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }
}

/// Parts of a refresh cycle that can fail independently
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefreshTarget {
    /// The category list
    Categories,
    /// Questions of one category
    Questions {
        /// Category whose bucket failed to refresh
        category_id: String,
    },
    /// Aggregate stats
    Stats,
}

impl std::fmt::Display for RefreshTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshTarget::Categories => write!(f, "categories"),
            RefreshTarget::Questions { category_id } => write!(f, "questions[{}]", category_id),
            RefreshTarget::Stats => write!(f, "stats"),
        }
    }
}

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Whether the category list was replaced
    pub categories_updated: bool,
    /// Categories whose buckets were replaced
    pub buckets_updated: Vec<String>,
    /// Whether stats were replaced
    pub stats_updated: bool,
    /// Fetches that failed with their error messages
    pub failed: Vec<(RefreshTarget, String)>,
    /// True when this caller joined a cycle that was already in flight
    pub joined: bool,
}

impl RefreshReport {
    /// True when every fetch of the cycle succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
