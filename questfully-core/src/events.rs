// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Event System
//!
//! Callbacks for content and favorites events. Failures that the data
//! layer swallows to keep serving stale content are reported here.

use std::sync::Arc;

use crate::content::RefreshTarget;

/// Events emitted by the data layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEvent {
    /// A new category list was published.
    CategoriesUpdated {
        /// Number of categories in the new list.
        count: usize,
    },

    /// Question buckets were replaced.
    QuestionsUpdated {
        /// Categories whose buckets changed.
        category_ids: Vec<String>,
    },

    /// New stats were published.
    StatsUpdated,

    /// A fetch failed; prior state was kept.
    FetchFailed {
        /// What failed to refresh.
        target: RefreshTarget,
        /// Error description.
        error: String,
    },

    /// Favorites were reconciled with the remote store.
    FavoritesSynced {
        /// Number of favorites after the merge.
        count: usize,
    },

    /// A favorite add/remove could not be pushed to the remote store.
    FavoritePushFailed {
        /// The question ID.
        question_id: String,
        /// Error description.
        error: String,
    },
}

/// Event handler trait.
///
/// Implement this trait to receive data layer events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: ContentEvent);
}

/// Simple callback-based event handler.
pub struct CallbackHandler<F>
where
    F: Fn(ContentEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(ContentEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(ContentEvent) + Send + Sync,
{
    fn on_event(&self, event: ContentEvent) {
        (self.callback)(event);
    }
}

/// Event dispatcher for managing multiple handlers.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: Vec::new(),
        }
    }

    /// Adds an event handler.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: ContentEvent) {
        for handler in &self.handlers {
            handler.on_event(event.clone());
        }
    }
}
