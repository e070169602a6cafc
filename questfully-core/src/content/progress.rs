//! Viewing progress derived from published content

use std::collections::HashMap;

use super::types::ContentSnapshot;

/// How far a reader has got through the loaded questions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewProgress {
    /// Questions available to view so far
    pub viewed: u64,
    /// Questions the server reports in total
    pub total: u64,
}

/// Compute progress for an optional focused category
///
/// `count_overrides` holds per-category counts fetched on demand and wins
/// over the counts embedded in stats.
pub fn view_progress(
    snapshot: &ContentSnapshot,
    focused_category: Option<&str>,
    count_overrides: &HashMap<String, u64>,
) -> ViewProgress {
    let Some(stats) = &snapshot.stats else {
        let total = focused_category
            .and_then(|id| count_overrides.get(id).copied())
            .unwrap_or(0);
        return ViewProgress { viewed: 0, total };
    };

    let Some(category_id) = focused_category else {
        let loaded = snapshot.loaded_question_count() as u64;
        return ViewProgress {
            viewed: loaded.min(stats.total_questions),
            total: stats.total_questions,
        };
    };

    let total = count_overrides
        .get(category_id)
        .or_else(|| stats.questions_per_category.get(category_id))
        .copied()
        .unwrap_or(0);
    let loaded = snapshot
        .questions
        .get(category_id)
        .map(|bucket| bucket.len() as u64)
        .unwrap_or(total);

    ViewProgress {
        viewed: loaded.min(total),
        total,
    }
}
