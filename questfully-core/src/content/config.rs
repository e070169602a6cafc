//! Configuration for the content API and local storage

use std::path::PathBuf;
use std::time::Duration;

/// Default address of the content API (local development server)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Configuration for the client data layer
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Local storage path for cache, favorites, device id and quota
    pub storage_path: PathBuf,

    /// Content API base URL (no trailing slash)
    pub api_url: String,

    /// Enable/disable remote fetches and favorite pushes
    pub remote_sync_enabled: bool,

    /// HTTP timeout for requests
    pub timeout: Duration,

    /// Proxy URL
    pub proxy_url: Option<String>,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("."),
            api_url: DEFAULT_API_URL.to_string(),
            remote_sync_enabled: true,
            timeout: Duration::from_secs(30),
            proxy_url: None,
            user_agent: format!(
                "Questfully/{}",
                option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
            ),
        }
    }
}

impl ApiConfig {
    /// Configure storage under the given directory
    pub fn with_storage_path(mut self, storage_path: impl Into<PathBuf>) -> Self {
        self.storage_path = storage_path.into();
        self
    }

    /// Configure a different API server
    ///
    /// A trailing slash is stripped so paths can be appended verbatim.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Configure with custom proxy
    pub fn with_proxy(mut self, proxy_url: String) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }

    /// Disable remote sync (serve cached content only)
    pub fn without_remote_sync(mut self) -> Self {
        self.remote_sync_enabled = false;
        self
    }
}
