use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://knowby-pro-backend-prod-qt5p6426oq-ts.a.run.app";

/// Listing page size. The dashboard only tracks the 24 most recently
/// updated knowbys.
const PUBLISHED_TAKE: i64 = 24;
/// Per-knowby event page size.
const EVENT_TAKE: i64 = 25;

/// A failed API call. Callers treat any variant as "no data from this
/// call"; nothing else escapes the client boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response body from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

pub struct ApiClient {
    credentials: Credentials,
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(credentials: Credentials, base_url: Option<String>) -> Self {
        Self {
            credentials,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: Client::new(),
        }
    }

    /// List the most recently updated published knowbys for the
    /// organisation. The endpoint is a POST with no body.
    pub fn list_published(&self) -> Result<Vec<Value>, ApiError> {
        let url = format!(
            "{}/api/knowby/published/{}?skip=0&take={}&sort=last_updated_at_utc&ascending=false&query=",
            self.base_url, self.credentials.organisation_id, PUBLISHED_TAKE
        );
        self.fetch_collection(Method::POST, &url)
    }

    /// Latest view events for one knowby.
    pub fn latest_views(&self, knowby_id: &str) -> Result<Vec<Value>, ApiError> {
        let url = format!(
            "{}/api/knowbyview/latest/{}?skip=0&take={}",
            self.base_url, knowby_id, EVENT_TAKE
        );
        self.fetch_collection(Method::GET, &url)
    }

    /// Latest completion events for one knowby.
    pub fn latest_completions(&self, knowby_id: &str) -> Result<Vec<Value>, ApiError> {
        let url = format!(
            "{}/api/knowbycompletion/latest/{}?skip=0&take={}",
            self.base_url, knowby_id, EVENT_TAKE
        );
        self.fetch_collection(Method::GET, &url)
    }

    /// Issue a request and return the `collection` array from the JSON
    /// body. Success is exactly HTTP 200; a 200 body without a
    /// `collection` field counts as an empty collection.
    fn fetch_collection(&self, method: Method, url: &str) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .client
            .request(method, url)
            .header("Authorization", &self.credentials.authorization)
            .header("X-Member-Id", &self.credentials.member_id)
            .header("X-Organisation-Id", &self.credentials.organisation_id)
            .header("User-Agent", "Mozilla/5.0")
            .header("Origin", "https://knowby.pro")
            .header("Referer", "https://knowby.pro/")
            .header("Accept", "*/*")
            .header("Content-Type", "application/json")
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body: Value = resp.json().map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(body
            .get("collection")
            .and_then(|c| c.as_array())
            .cloned()
            .unwrap_or_default())
    }
}
