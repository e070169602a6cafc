//! Questfully Core Library
//!
//! Client data layer for the Questfully question catalogue: cached
//! content with remote refresh, favorites reconciled across installs, and
//! the daily question quota.

pub mod content;
pub mod events;
pub mod favorites;
pub mod quota;

pub use content::{
    view_progress, ApiClient, ApiConfig, CacheError, Category, ContentCache, ContentSnapshot,
    ContentSource, ContentStore, FavoritesRemote, FetchError, Question, QuestionBuckets,
    RefreshReport, RefreshTarget, Stats, ViewProgress,
};
pub use events::{CallbackHandler, ContentEvent, EventDispatcher, EventHandler};
pub use favorites::{merge_favorites, DeviceId, FavoritesError, FavoritesManager};
pub use quota::{DailyQuota, QuotaError, DEFAULT_DAILY_LIMIT};
