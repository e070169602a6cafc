// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Favorites Reconciliation

use std::collections::{HashMap, HashSet};

use crate::content::Question;

/// Merges the local favorite list with the remote one.
///
/// The remote list decides membership and content:
/// 1. local entries missing remotely are dropped,
/// 2. surviving entries take the remote copy,
/// 3. remote entries not yet present are appended in remote order.
///
/// Surviving local entries keep their local order. The result never holds
/// two entries with the same id.
pub fn merge_favorites(local: &[Question], remote: &[Question]) -> Vec<Question> {
    let mut remote_by_id: HashMap<&str, &Question> = HashMap::with_capacity(remote.len());
    for question in remote {
        remote_by_id.entry(question.id.as_str()).or_insert(question);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(remote.len());
    let mut merged = Vec::with_capacity(remote.len());

    for question in local {
        if let Some(remote_copy) = remote_by_id.get(question.id.as_str()) {
            if seen.insert(remote_copy.id.as_str()) {
                merged.push((*remote_copy).clone());
            }
        }
    }

    for question in remote {
        if seen.insert(question.id.as_str()) {
            merged.push(question.clone());
        }
    }

    merged
}
