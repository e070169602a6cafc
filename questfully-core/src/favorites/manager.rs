//! Favorites Manager
//!
//! Keeps the favorite list locally authoritative for the session and
//! mirrors it to the remote store on a best-effort basis. Local changes
//! are persisted before the remote is told about them, and a failed
//! remote push never rolls a local change back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::device::DeviceId;
use super::merge::merge_favorites;
use super::FavoritesError;
use crate::content::{atomic_write, ApiConfig, FavoritesRemote, FetchError, Question};
use crate::events::{ContentEvent, EventDispatcher, EventHandler};

const FAVORITES_FILE: &str = "favorites.json";

#[derive(Debug, Clone, Copy)]
enum PushKind {
    Add,
    Remove,
}

/// Locally persisted favorites mirrored to a remote store.
pub struct FavoritesManager {
    device_id: DeviceId,
    path: PathBuf,
    favorites: RwLock<Vec<Question>>,
    remote: Arc<dyn FavoritesRemote>,
    remote_sync_enabled: bool,
    events: Arc<RwLock<EventDispatcher>>,
}

impl FavoritesManager {
    /// Loads favorites and the device id from `config.storage_path`.
    ///
    /// A missing or corrupt favorites file yields an empty list.
    pub fn load(
        config: &ApiConfig,
        remote: Arc<dyn FavoritesRemote>,
    ) -> Result<Self, FavoritesError> {
        let device_id = DeviceId::load_or_create(&config.storage_path)?;
        let path = config.storage_path.join(FAVORITES_FILE);
        let favorites = read_favorites(&path);
        debug!("Loaded {} favorites for device {}", favorites.len(), device_id);

        Ok(Self {
            device_id,
            path,
            favorites: RwLock::new(favorites),
            remote,
            remote_sync_enabled: config.remote_sync_enabled,
            events: Arc::new(RwLock::new(EventDispatcher::new())),
        })
    }

    /// Returns this install's device id.
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the current favorites in order.
    pub fn favorites(&self) -> Vec<Question> {
        self.favorites.read().clone()
    }

    /// Returns true if a question with the same id is a favorite.
    pub fn is_favorited(&self, question: &Question) -> bool {
        self.favorites.read().iter().any(|f| f.id == question.id)
    }

    /// Registers an observer for favorites events.
    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.events.write().add_handler(handler);
    }

    /// Adds a favorite and pushes it to the remote store.
    ///
    /// Adding an id that is already present does nothing and returns
    /// `None`. Otherwise the change is persisted before returning and the
    /// handle of the background push is returned, if one was started.
    pub fn add_favorite(&self, question: &Question) -> Option<JoinHandle<()>> {
        {
            let mut favorites = self.favorites.write();
            if favorites.iter().any(|f| f.id == question.id) {
                return None;
            }
            favorites.push(question.clone());
            self.persist(&favorites);
        }
        self.push(PushKind::Add, question.id.clone())
    }

    /// Removes a favorite and pushes the removal to the remote store.
    pub fn remove_favorite(&self, question: &Question) -> Option<JoinHandle<()>> {
        {
            let mut favorites = self.favorites.write();
            favorites.retain(|f| f.id != question.id);
            self.persist(&favorites);
        }
        self.push(PushKind::Remove, question.id.clone())
    }

    /// Reconciles local favorites with the remote list.
    ///
    /// On success the merged list replaces the local one and is persisted.
    /// On failure local state is left untouched.
    pub async fn sync_favorites(&self) -> Result<Vec<Question>, FavoritesError> {
        if !self.remote_sync_enabled {
            return Err(FetchError::Disabled.into());
        }

        let remote = self
            .remote
            .fetch_favorites(self.device_id.as_str())
            .await
            .inspect_err(|e| warn!("Failed to fetch remote favorites: {}", e))?;

        let merged = {
            let mut favorites = self.favorites.write();
            let merged = merge_favorites(&favorites, &remote);
            *favorites = merged;
            self.persist(&favorites);
            favorites.clone()
        };

        info!("Favorites synced: {} entries", merged.len());
        let event = ContentEvent::FavoritesSynced {
            count: merged.len(),
        };
        let dispatcher = self.events.read().clone();
        dispatcher.dispatch(event);
        Ok(merged)
    }

    fn persist(&self, favorites: &[Question]) {
        let result = serde_json::to_vec_pretty(favorites)
            .map_err(FavoritesError::from)
            .and_then(|data| atomic_write(&self.path, &data).map_err(FavoritesError::from));
        if let Err(e) = result {
            warn!("Failed to save favorites: {}", e);
        }
    }

    fn push(&self, kind: PushKind, question_id: String) -> Option<JoinHandle<()>> {
        if !self.remote_sync_enabled {
            return None;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime, favorite {} not pushed", question_id);
            return None;
        };

        let remote = self.remote.clone();
        let device_id = self.device_id.to_string();
        let events = self.events.clone();

        Some(runtime.spawn(async move {
            let result = match kind {
                PushKind::Add => remote.add_favorite(&device_id, &question_id).await,
                PushKind::Remove => remote.remove_favorite(&device_id, &question_id).await,
            };
            if let Err(e) = result {
                warn!("Error syncing favorite {:?} for {}: {}", kind, question_id, e);
                let dispatcher = events.read().clone();
                dispatcher.dispatch(ContentEvent::FavoritePushFailed {
                    question_id,
                    error: e.to_string(),
                });
            }
        }))
    }
}

fn read_favorites(path: &Path) -> Vec<Question> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("Failed to read favorites: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<Question>>(&data) {
        // Collapses duplicate ids left by older writers
        Ok(stored) => merge_favorites(&[], &stored),
        Err(e) => {
            warn!("Discarding corrupt favorites file: {}", e);
            Vec::new()
        }
    }
}
