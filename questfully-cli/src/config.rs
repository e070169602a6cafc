//! CLI Configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use questfully_core::{ApiClient, ApiConfig, ContentStore, DailyQuota, FavoritesManager};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for storage.
    pub data_dir: PathBuf,
    /// Content API base URL.
    pub api_url: String,
    /// Optional proxy for API requests.
    pub proxy_url: Option<String>,
    /// Never contact the API.
    pub offline: bool,
}

impl CliConfig {
    /// Builds the library configuration.
    pub fn api_config(&self) -> ApiConfig {
        let mut config = ApiConfig::default()
            .with_storage_path(&self.data_dir)
            .with_api_url(&self.api_url);
        if let Some(proxy) = &self.proxy_url {
            config = config.with_proxy(proxy.clone());
        }
        if self.offline {
            config = config.without_remote_sync();
        }
        config
    }

    /// Creates the API client.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.api_config())
            .with_context(|| format!("Cannot use API URL {}", self.api_url))
    }

    /// Opens the content store on top of the local cache.
    pub fn open_store(&self) -> Result<ContentStore<ApiClient>> {
        let store = ContentStore::new(&self.api_config(), self.client()?)
            .with_context(|| format!("Cannot open cache in {}", self.data_dir.display()))?;
        Ok(store)
    }

    /// Loads favorites for this install.
    pub fn open_favorites(&self) -> Result<FavoritesManager> {
        let favorites = FavoritesManager::load(&self.api_config(), Arc::new(self.client()?))?;
        Ok(favorites)
    }

    /// Loads the daily quota for today.
    pub fn open_quota(&self) -> Result<DailyQuota> {
        Ok(DailyQuota::load(&self.data_dir, today())?)
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
