//! Catalog feed sources.
//!
//! A feed is a JSON array of raw catalog records, fetched once per load.
//! Records are returned undecoded so the normalizer can skip bad entries one
//! by one.

mod file;
mod http;

pub use file::FileFeed;
pub use http::HttpFeed;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{FeedConfig, FeedSourceKind};

/// Errors that can occur while fetching the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Catalog data not found: {status} {message}")]
    Status { status: u16, message: String },

    /// Request took longer than the configured timeout.
    #[error("Feed request timed out")]
    Timeout,

    /// Reading a local feed failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Body was not a JSON array.
    #[error("Failed to parse feed: {0}")]
    Parse(String),

    /// Source is missing required settings.
    #[error("Feed not configured: {0}")]
    NotConfigured(String),
}

/// Trait for catalog feed sources.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Name of this source for logging.
    fn name(&self) -> &str;

    /// Fetch all raw records, in feed order.
    async fn fetch(&self) -> Result<Vec<Value>, FeedError>;
}

/// Build the feed source selected in config.
pub fn create_feed(config: &FeedConfig) -> Result<Box<dyn FeedSource>, FeedError> {
    match config.source {
        FeedSourceKind::Http => Ok(Box::new(HttpFeed::new(config)?)),
        FeedSourceKind::File => Ok(Box::new(FileFeed::new(&config.path))),
    }
}

/// Decode a feed body into its records.
pub fn parse_records(body: &str) -> Result<Vec<Value>, FeedError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(FeedError::Parse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(FeedError::Parse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
