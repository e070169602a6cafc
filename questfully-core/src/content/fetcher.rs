//! Content API client
//!
//! This module provides the HTTP client for the content service:
//! - Categories, per-category questions, stats and counts
//! - Per-device favorites
//!
//! Every call is a single round trip with no retries. The rest of the
//! crate talks to the service through the [`ContentSource`] and
//! [`FavoritesRemote`] traits so tests can swap in in-memory sources.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::ApiConfig;
use super::types::{Category, Question, Stats};

/// Read side of the content service used by the content store
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the full category list
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError>;

    /// Fetch every question of one category
    async fn fetch_questions(&self, category_id: &str) -> Result<Vec<Question>, FetchError>;

    /// Fetch aggregate stats
    async fn fetch_stats(&self) -> Result<Stats, FetchError>;
}

/// Remote favorites store, partitioned by device id
#[async_trait]
pub trait FavoritesRemote: Send + Sync {
    /// Fetch the favorites recorded for a device
    async fn fetch_favorites(&self, device_id: &str) -> Result<Vec<Question>, FetchError>;

    /// Record a favorite for a device
    async fn add_favorite(&self, device_id: &str, question_id: &str) -> Result<(), FetchError>;

    /// Forget a favorite for a device
    async fn remove_favorite(&self, device_id: &str, question_id: &str)
        -> Result<(), FetchError>;
}

/// Body of favorite add/remove requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoritePayload<'a> {
    device_id: &'a str,
    question_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the content API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from config
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let base_url = Url::parse(&config.api_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.api_url.clone()));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetch the number of questions in a category
    pub async fn fetch_question_count(&self, category_id: &str) -> Result<u64, FetchError> {
        let url = self.endpoint(&["categories", category_id, "count"])?;
        let response: CountResponse = self.get_json(url).await?;
        Ok(response.count)
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_favorite(
        &self,
        method: reqwest::Method,
        device_id: &str,
        question_id: &str,
    ) -> Result<(), FetchError> {
        let url = self.endpoint(&["favorites"])?;
        let payload = FavoritePayload {
            device_id,
            question_id,
        };
        let response = self
            .client
            .request(method, url)
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentSource for ApiClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let url = self.endpoint(&["categories"])?;
        self.get_json(url).await
    }

    async fn fetch_questions(&self, category_id: &str) -> Result<Vec<Question>, FetchError> {
        let url = self.endpoint(&["categories", category_id, "questions"])?;
        self.get_json(url).await
    }

    async fn fetch_stats(&self) -> Result<Stats, FetchError> {
        let url = self.endpoint(&["stats"])?;
        self.get_json(url).await
    }
}

#[async_trait]
impl FavoritesRemote for ApiClient {
    async fn fetch_favorites(&self, device_id: &str) -> Result<Vec<Question>, FetchError> {
        let url = self.endpoint(&["favorites", device_id])?;
        self.get_json(url).await
    }

    async fn add_favorite(&self, device_id: &str, question_id: &str) -> Result<(), FetchError> {
        self.send_favorite(reqwest::Method::POST, device_id, question_id)
            .await
    }

    async fn remove_favorite(
        &self,
        device_id: &str,
        question_id: &str,
    ) -> Result<(), FetchError> {
        self.send_favorite(reqwest::Method::DELETE, device_id, question_id)
            .await
    }
}

/// Turn a non-2xx response into [`FetchError::Status`]
async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

/// Extract a readable message from an error body
///
/// Accepts `{"error": "..."}` or plain text; falls back to the status
/// reason phrase when the body is empty.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

/// Errors that can occur when talking to the content API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message parsed from the response body
        message: String,
    },

    /// Network/request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Payload did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configured API URL cannot be used
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Remote sync is disabled by configuration
    #[error("Remote sync is disabled")]
    Disabled,
}
