//! Favorites Commands
//!
//! Favorites are stored locally and mirrored to the API.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use questfully_core::{CallbackHandler, ContentEvent, FavoritesManager};

use crate::config::CliConfig;
use crate::display;

/// Loads favorites and reports failed pushes on the terminal.
fn open_favorites(config: &CliConfig) -> Result<FavoritesManager> {
    let favorites = config.open_favorites()?;
    favorites.add_handler(Arc::new(CallbackHandler::new(|event| {
        if let ContentEvent::FavoritePushFailed { question_id, error } = event {
            display::warning(&format!(
                "Saved locally, but the server did not get {}: {}",
                question_id, error
            ));
        }
    })));
    Ok(favorites)
}

/// Lists favorites in order.
pub fn list(config: &CliConfig, json: bool) -> Result<()> {
    let favorites = config.open_favorites()?.favorites();

    if json {
        println!("{}", serde_json::to_string_pretty(&favorites)?);
        return Ok(());
    }

    if favorites.is_empty() {
        display::info("No favorites yet. Add one with 'questfully favorites add <id>'");
        return Ok(());
    }

    println!("Favorites ({}):", favorites.len());
    println!();
    for (i, question) in favorites.iter().enumerate() {
        display::display_question(question, i);
    }
    Ok(())
}

/// Favorites a question from the cached catalogue.
pub async fn add(config: &CliConfig, question_id: &str) -> Result<()> {
    let snapshot = config.open_store()?.snapshot();
    let question = snapshot
        .questions
        .values()
        .flatten()
        .find(|q| q.id == question_id)
        .ok_or_else(|| anyhow!("Question not cached: {}", question_id))?;

    let favorites = open_favorites(config)?;
    if favorites.is_favorited(question) {
        display::info("Already a favorite.");
        return Ok(());
    }

    if let Some(push) = favorites.add_favorite(question) {
        push.await?;
    }
    display::success(&format!("Added favorite: {}", question.text));
    Ok(())
}

/// Removes a favorite.
pub async fn remove(config: &CliConfig, question_id: &str) -> Result<()> {
    let favorites = open_favorites(config)?;
    let Some(question) = favorites
        .favorites()
        .into_iter()
        .find(|q| q.id == question_id)
    else {
        display::info(&format!("{} is not a favorite.", question_id));
        return Ok(());
    };

    if let Some(push) = favorites.remove_favorite(&question) {
        push.await?;
    }
    display::success(&format!("Removed favorite: {}", question.text));
    Ok(())
}

/// Reconciles favorites with the API.
pub async fn sync(config: &CliConfig) -> Result<()> {
    let favorites = open_favorites(config)?;
    let before = favorites.favorites().len();

    let merged = favorites.sync_favorites().await?;

    display::success(&format!(
        "Favorites synced: {} before, {} now",
        before,
        merged.len()
    ));
    display::info(&format!("Device: {}", favorites.device_id()));
    Ok(())
}
