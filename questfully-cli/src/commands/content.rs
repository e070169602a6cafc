//! Content Commands
//!
//! Refresh and browse the cached question catalogue.

use std::collections::HashMap;

use anyhow::{bail, Result};
use questfully_core::view_progress;
use tracing::warn;

use crate::config::CliConfig;
use crate::display;

/// Runs one refresh cycle against the API.
pub async fn refresh(config: &CliConfig) -> Result<()> {
    if config.offline {
        display::warning("Offline mode: nothing to refresh.");
        return Ok(());
    }

    let store = config.open_store()?;
    println!("Refreshing from {}...", config.api_url);

    let report = store.refresh_content().await;
    display::display_report(&report);

    let snapshot = store.snapshot();
    display::info(&format!(
        "{} categories, {} questions cached",
        snapshot.categories.len(),
        snapshot.loaded_question_count()
    ));
    Ok(())
}

/// Lists cached categories in server order.
pub fn categories(config: &CliConfig, json: bool) -> Result<()> {
    let store = config.open_store()?;
    let snapshot = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.categories)?);
        return Ok(());
    }

    if snapshot.categories.is_empty() {
        display::info("No categories cached. Run 'questfully refresh' first.");
        return Ok(());
    }

    println!("Categories:");
    println!();
    for category in &snapshot.categories {
        display::display_category(category, snapshot.questions_for(&category.id).len());
    }
    Ok(())
}

/// Lists the cached questions of one category.
pub fn questions(config: &CliConfig, category_id: &str, json: bool) -> Result<()> {
    let store = config.open_store()?;
    let snapshot = store.snapshot();

    if !snapshot.categories.iter().any(|c| c.id == category_id) {
        bail!("Unknown category: {}", category_id);
    }
    let bucket = snapshot.questions_for(category_id);

    if json {
        println!("{}", serde_json::to_string_pretty(bucket)?);
        return Ok(());
    }

    if bucket.is_empty() {
        display::info("No questions cached for this category yet.");
        return Ok(());
    }
    for (i, question) in bucket.iter().enumerate() {
        display::display_question(question, i);
    }
    Ok(())
}

/// Shows cached stats.
pub fn stats(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;

    let Some(stats) = store.stats() else {
        display::info("No stats cached. Run 'questfully refresh' first.");
        return Ok(());
    };

    println!("Questions:  {}", stats.total_questions);
    println!("Categories: {}", stats.total_categories);
    let mut per_category: Vec<_> = stats.questions_per_category.iter().collect();
    per_category.sort();
    for (category_id, count) in per_category {
        println!("  {:20} {}", category_id, count);
    }
    Ok(())
}

/// Asks the API for a category's question count.
pub async fn count(config: &CliConfig, category_id: &str) -> Result<()> {
    if config.offline {
        bail!("Counting questions needs the API; drop --offline.");
    }
    let count = config.client()?.fetch_question_count(category_id).await?;
    println!("{}", count);
    Ok(())
}

/// Shows loaded versus total questions.
pub async fn progress(config: &CliConfig, category_id: Option<&str>) -> Result<()> {
    let store = config.open_store()?;
    let snapshot = store.snapshot();

    let mut overrides = HashMap::new();
    if let (Some(id), false) = (category_id, config.offline) {
        match store.source().fetch_question_count(id).await {
            Ok(count) => {
                overrides.insert(id.to_string(), count);
            }
            Err(e) => {
                warn!("Question count for {} unavailable: {}", id, e);
                display::warning("Using cached count.");
            }
        }
    }

    let progress = view_progress(&snapshot, category_id, &overrides);
    display::display_progress(category_id.unwrap_or("all"), progress);
    Ok(())
}

/// Prints the cache directory.
pub fn cache_path(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;
    println!("{}", store.cache().cache_dir().display());
    Ok(())
}

/// Deletes cached content.
pub fn clear_cache(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;
    store.cache().clear();
    display::success("Content cache cleared.");
    Ok(())
}
