use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::fear_greed::IndexSnapshot;
use crate::services::identity::{ClientIdentity, RandomUserAgent};
use crate::services::normalizer::normalize;
use crate::services::validator::{validate, ValidationError};
use crate::utils::formatters::format_score;

pub const CNN_FEAR_GREED_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch Fear and Greed data: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to fetch Fear and Greed data: HTTP error! status: {}", .status.as_u16())]
    Status { status: StatusCode },
    #[error("Failed to fetch Fear and Greed data: invalid JSON in response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to fetch Fear and Greed data: {0}")]
    Validation(#[from] ValidationError),
}

/// Fetches the Fear & Greed index from CNN's dataviz endpoint
#[derive(Clone)]
pub struct FearGreedClient {
    http: reqwest::Client,
    endpoint: String,
    identity: Arc<dyn ClientIdentity>,
}

impl Default for FearGreedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FearGreedClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: CNN_FEAR_GREED_URL.to_string(),
            identity: Arc::new(RandomUserAgent),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_identity(mut self, identity: impl ClientIdentity + 'static) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches, normalizes and validates one snapshot. Single attempt, no retries.
    pub async fn fetch_index(&self) -> Result<IndexSnapshot, FetchError> {
        match self.fetch_inner().await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                error!(endpoint = %self.endpoint, error = %err, "fear & greed fetch failed");
                Err(err)
            }
        }
    }

    async fn fetch_inner(&self) -> Result<IndexSnapshot, FetchError> {
        debug!(endpoint = %self.endpoint, "fetching fear & greed index");

        let response = self
            .http
            .get(&self.endpoint)
            .headers(self.request_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let response_text = response.text().await?;
        let raw: Value = serde_json::from_str(&response_text)?;
        let normalized = normalize(raw);
        debug!(slots = normalized.len(), "normalized provider payload");

        let snapshot = validate(&normalized)?;

        info!(
            score = %format_score(snapshot.fear_and_greed.score),
            rating = %snapshot.fear_and_greed.rating,
            timestamp = %snapshot.fear_and_greed.timestamp,
            "fear & greed index fetched"
        );
        for (slot, record) in snapshot.inconsistencies() {
            warn!(
                slot = %slot,
                score = %format_score(record.score),
                rating = %record.rating,
                "score outside the documented band for its rating"
            );
        }

        Ok(snapshot)
    }

    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(ua) = self.identity.user_agent() {
            match HeaderValue::from_str(&ua) {
                Ok(value) => {
                    headers.insert(header::USER_AGENT, value);
                }
                Err(_) => warn!(user_agent = %ua, "skipping unusable User-Agent"),
            }
        }
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::REFERER, HeaderValue::from_static("https://www.cnn.com/"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://www.cnn.com"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }
}
