//! Feed served over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::FeedConfig;

use super::{parse_records, FeedError, FeedSource};

/// Fetches `catalog-data.json` (or any JSON array) from a URL.
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    /// Create a new HTTP feed. Requests give up after `timeout_secs`.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FeedError::NotConfigured("feed.url is not set".to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
        debug!(url = %self.url, "Fetching catalog feed");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Http(e)
            }
        })?;

        parse_records(&body)
    }
}
