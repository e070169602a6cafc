// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Daily Question Quota
//!
//! Free installs may view a limited number of questions per calendar
//! day. Premium status lifts the limit; it is decided elsewhere and only
//! handed in here. Counters are persisted in `quota.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::content::{atomic_write, CacheError};

/// Questions a free install may view per day.
pub const DEFAULT_DAILY_LIMIT: u32 = 15;

const QUOTA_FILE: &str = "quota.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotaState {
    date: NaiveDate,
    consumed_today: u32,
    total_viewed: u64,
}

impl QuotaState {
    fn fresh(today: NaiveDate, total_viewed: u64) -> Self {
        Self {
            date: today,
            consumed_today: 0,
            total_viewed,
        }
    }
}

/// Per-day question view counter.
#[derive(Debug)]
pub struct DailyQuota {
    path: PathBuf,
    limit: u32,
    premium: bool,
    state: QuotaState,
}

impl DailyQuota {
    /// Loads the quota from `storage_path`, rolling over to `today`.
    ///
    /// A missing or corrupt file starts a fresh day with no views.
    pub fn load(storage_path: &Path, today: NaiveDate) -> Result<Self, QuotaError> {
        fs::create_dir_all(storage_path)?;
        let path = storage_path.join(QUOTA_FILE);
        let state = read_state(&path).unwrap_or_else(|| QuotaState::fresh(today, 0));

        let mut quota = Self {
            path,
            limit: DEFAULT_DAILY_LIMIT,
            premium: false,
            state,
        };
        quota.roll_over(today);
        quota.state.consumed_today = quota.state.consumed_today.min(quota.limit);
        Ok(quota)
    }

    /// Overrides the daily limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self.state.consumed_today = self.state.consumed_today.min(limit);
        self
    }

    /// Returns the daily limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Sets premium status.
    pub fn set_premium(&mut self, premium: bool) {
        self.premium = premium;
    }

    /// Returns true if premium status is active.
    pub fn is_premium(&self) -> bool {
        self.premium
    }

    /// Questions counted against `today`'s quota.
    pub fn questions_consumed(&self, today: NaiveDate) -> u32 {
        if self.state.date == today {
            self.state.consumed_today
        } else {
            0
        }
    }

    /// Questions viewed since install.
    pub fn total_viewed(&self) -> u64 {
        self.state.total_viewed
    }

    /// Questions left for `today`, `None` when premium.
    pub fn remaining(&self, today: NaiveDate) -> Option<u32> {
        if self.premium {
            return None;
        }
        Some(self.limit.saturating_sub(self.questions_consumed(today)))
    }

    /// Returns true if another question may be viewed `today`.
    pub fn can_view_another(&self, today: NaiveDate) -> bool {
        self.premium || self.questions_consumed(today) < self.limit
    }

    /// Returns true if the paywall should be shown.
    pub fn should_present_paywall(&self, today: NaiveDate) -> bool {
        !self.can_view_another(today)
    }

    /// Counts one question view.
    ///
    /// Returns `false` without counting when the quota is exhausted.
    /// Premium views only bump the lifetime total.
    pub fn register_view(&mut self, today: NaiveDate) -> Result<bool, QuotaError> {
        self.roll_over(today);

        if !self.premium {
            if self.state.consumed_today >= self.limit {
                debug!("Daily quota of {} reached", self.limit);
                return Ok(false);
            }
            self.state.consumed_today += 1;
        }
        self.state.total_viewed += 1;
        self.persist()?;
        Ok(true)
    }

    /// Drops premium status and restarts today's count.
    pub fn reset_to_limited(&mut self, today: NaiveDate) -> Result<(), QuotaError> {
        self.premium = false;
        self.state = QuotaState::fresh(today, self.state.total_viewed);
        self.persist()
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if self.state.date != today {
            self.state = QuotaState::fresh(today, self.state.total_viewed);
        }
    }

    fn persist(&self) -> Result<(), QuotaError> {
        let data = serde_json::to_vec_pretty(&self.state)?;
        atomic_write(&self.path, &data)?;
        Ok(())
    }
}

fn read_state(path: &Path) -> Option<QuotaState> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read quota: {}", e);
            return None;
        }
    };
    serde_json::from_slice(&data)
        .inspect_err(|e| warn!("Discarding corrupt quota file: {}", e))
        .ok()
}

/// Errors that can occur with the quota
#[derive(Debug, Error)]
pub enum QuotaError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Local write failed
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
