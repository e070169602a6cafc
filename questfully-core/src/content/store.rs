//! Content Store - orchestrates cached and remote content
//!
//! The ContentStore is the main entry point for content. It coordinates:
//! - Cached content (served immediately on cold start)
//! - Remote content (fetched by refresh cycles)
//! - Published state (a snapshot observers can subscribe to)
//!
//! A refresh cycle runs two independent tracks concurrently: categories
//! followed by every category's questions, and stats. A failure in one
//! fetch never clears previously published state or aborts the others.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache::{CacheError, ContentCache};
use super::config::ApiConfig;
use super::fetcher::{ContentSource, FetchError};
use super::types::{
    Category, ContentSnapshot, Question, QuestionBuckets, RefreshReport, RefreshTarget, Stats,
};
use crate::events::{ContentEvent, EventDispatcher, EventHandler};

/// Manages published content with cache → remote refresh
pub struct ContentStore<S: ContentSource> {
    source: S,
    cache: ContentCache,
    remote_sync_enabled: bool,
    state: RwLock<ContentSnapshot>,
    published: watch::Sender<ContentSnapshot>,
    events: RwLock<EventDispatcher>,
    in_flight: tokio::sync::Mutex<()>,
    /// Number of finished cycles and the report of the latest one
    last_cycle: Mutex<(u64, RefreshReport)>,
}

impl<S: ContentSource> ContentStore<S> {
    /// Create a store backed by a cache under `config.storage_path`
    ///
    /// The cached snapshot is loaded synchronously so consumers see the
    /// last known good content before any refresh.
    pub fn new(config: &ApiConfig, source: S) -> Result<Self, CacheError> {
        let cache = ContentCache::new(&config.storage_path)?;
        Ok(Self::with_cache(cache, source, config.remote_sync_enabled))
    }

    /// Create a store over an existing cache
    pub fn with_cache(cache: ContentCache, source: S, remote_sync_enabled: bool) -> Self {
        let snapshot = ContentSnapshot {
            categories: cache.load_categories(),
            questions: cache.load_questions(),
            stats: cache.load_stats(),
        };
        debug!(
            "Loaded cached content: {} categories, {} questions",
            snapshot.categories.len(),
            snapshot.loaded_question_count()
        );

        let (published, _) = watch::channel(snapshot.clone());
        Self {
            source,
            cache,
            remote_sync_enabled,
            state: RwLock::new(snapshot),
            published,
            events: RwLock::new(EventDispatcher::new()),
            in_flight: tokio::sync::Mutex::new(()),
            last_cycle: Mutex::new((0, RefreshReport::default())),
        }
    }

    /// Current published snapshot
    pub fn snapshot(&self) -> ContentSnapshot {
        self.state.read().clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<ContentSnapshot> {
        self.published.subscribe()
    }

    /// Current category list
    pub fn categories(&self) -> Vec<Category> {
        self.state.read().categories.clone()
    }

    /// Questions for a category (empty when unknown)
    pub fn questions_for(&self, category_id: &str) -> Vec<Question> {
        self.state.read().questions_for(category_id).to_vec()
    }

    /// Latest stats, if any
    pub fn stats(&self) -> Option<Stats> {
        self.state.read().stats.clone()
    }

    /// Register an observer for content events
    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.events.write().add_handler(handler);
    }

    /// Get access to the cache (for advanced operations)
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Get access to the content source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one refresh cycle
    ///
    /// Returns once both tracks have finished. A call made while a cycle
    /// is already running does not start another; it waits for the running
    /// cycle and returns that cycle's report with `joined` set. If the
    /// joined cycle is dropped before it finishes, the waiting call runs a
    /// cycle of its own.
    pub async fn refresh_content(&self) -> RefreshReport {
        let seen = self.last_cycle.lock().0;
        let _cycle = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Refresh already in flight, joining it");
                let guard = self.in_flight.lock().await;
                let (finished, report) = self.last_cycle.lock().clone();
                if finished != seen {
                    return RefreshReport {
                        joined: true,
                        ..report
                    };
                }
                debug!("Joined refresh was abandoned, starting a new cycle");
                guard
            }
        };

        let report = if self.remote_sync_enabled {
            let (content, stats) =
                tokio::join!(self.refresh_categories_and_questions(), self.refresh_stats());
            merge_reports(content, stats)
        } else {
            debug!("Remote sync disabled, serving cached content");
            let reason = FetchError::Disabled.to_string();
            RefreshReport {
                failed: vec![
                    (RefreshTarget::Categories, reason.clone()),
                    (RefreshTarget::Stats, reason),
                ],
                ..Default::default()
            }
        };

        info!(
            "Refresh finished: categories={}, buckets={}, stats={}, failures={}",
            report.categories_updated,
            report.buckets_updated.len(),
            report.stats_updated,
            report.failed.len()
        );
        {
            let mut last = self.last_cycle.lock();
            last.0 += 1;
            last.1 = report.clone();
        }
        report
    }

    async fn refresh_categories_and_questions(&self) -> RefreshReport {
        let mut report = RefreshReport::default();

        let categories = match self.source.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                self.report_failure(&mut report, RefreshTarget::Categories, &e);
                return report;
            }
        };

        // Seed buckets before any question fetch starts so consumers never
        // see a category without a bucket.
        self.update(|state| {
            for category in &categories {
                state.questions.entry(category.id.clone()).or_default();
            }
            state.categories = categories.clone();
        });
        self.cache.save_categories(&categories);
        report.categories_updated = true;
        self.dispatch(ContentEvent::CategoriesUpdated {
            count: categories.len(),
        });

        let fetches = categories.iter().map(|category| async move {
            let result = self.source.fetch_questions(&category.id).await;
            (category.id.as_str(), result)
        });

        let mut fetched: Vec<(String, Vec<Question>)> = Vec::new();
        for (category_id, result) in join_all(fetches).await {
            match result {
                Ok(questions) => {
                    let normalized = questions
                        .into_iter()
                        .map(|q| q.in_category(category_id))
                        .collect();
                    fetched.push((category_id.to_string(), normalized));
                }
                Err(e) => {
                    let target = RefreshTarget::Questions {
                        category_id: category_id.to_string(),
                    };
                    self.report_failure(&mut report, target, &e);
                }
            }
        }

        if fetched.is_empty() {
            return report;
        }

        let buckets: QuestionBuckets = self.update(|state| {
            for (category_id, questions) in fetched {
                state.questions.insert(category_id.clone(), questions);
                report.buckets_updated.push(category_id);
            }
            state.questions.clone()
        });
        self.cache.save_questions(&buckets);
        self.dispatch(ContentEvent::QuestionsUpdated {
            category_ids: report.buckets_updated.clone(),
        });

        report
    }

    async fn refresh_stats(&self) -> RefreshReport {
        let mut report = RefreshReport::default();

        match self.source.fetch_stats().await {
            Ok(stats) => {
                self.cache.save_stats(&stats);
                self.update(|state| state.stats = Some(stats));
                report.stats_updated = true;
                self.dispatch(ContentEvent::StatsUpdated);
            }
            Err(e) => self.report_failure(&mut report, RefreshTarget::Stats, &e),
        }

        report
    }

    /// Mutate the snapshot and publish the result
    fn update<T>(&self, f: impl FnOnce(&mut ContentSnapshot) -> T) -> T {
        let mut state = self.state.write();
        let out = f(&mut state);
        self.published.send_replace(state.clone());
        out
    }

    fn report_failure(&self, report: &mut RefreshReport, target: RefreshTarget, error: &FetchError) {
        warn!("Failed to fetch {}: {}", target, error);
        report.failed.push((target.clone(), error.to_string()));
        self.dispatch(ContentEvent::FetchFailed {
            target,
            error: error.to_string(),
        });
    }

    fn dispatch(&self, event: ContentEvent) {
        // Handlers may register further handlers
        let dispatcher = self.events.read().clone();
        dispatcher.dispatch(event);
    }
}

fn merge_reports(content: RefreshReport, stats: RefreshReport) -> RefreshReport {
    let mut failed = content.failed;
    failed.extend(stats.failed);
    RefreshReport {
        categories_updated: content.categories_updated,
        buckets_updated: content.buckets_updated,
        stats_updated: stats.stats_updated,
        failed,
        joined: false,
    }
}
