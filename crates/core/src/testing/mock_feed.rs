//! Mock feed source for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::feed::{FeedError, FeedSource};

/// Failure a `MockFeed` should report instead of returning records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Status(u16),
    Timeout,
    Parse(String),
}

impl MockFailure {
    fn to_error(&self) -> FeedError {
        match self {
            MockFailure::Status(status) => FeedError::Status {
                status: *status,
                message: "mock failure".to_string(),
            },
            MockFailure::Timeout => FeedError::Timeout,
            MockFailure::Parse(msg) => FeedError::Parse(msg.clone()),
        }
    }
}

/// Mock implementation of the FeedSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable records
/// - Simulate transport and parse failures
/// - Count fetches
#[derive(Debug, Default)]
pub struct MockFeed {
    records: Arc<RwLock<Vec<Value>>>,
    failure: Arc<RwLock<Option<MockFailure>>>,
    fetches: AtomicUsize,
}

impl MockFeed {
    /// Create a mock feed with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock feed with predefined records.
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Create a mock feed that always fails.
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Arc::new(RwLock::new(Some(failure))),
            ..Self::default()
        }
    }

    /// Replace the records returned by later fetches.
    pub async fn set_records(&self, records: Vec<Value>) {
        *self.records.write().await = records;
    }

    /// Make later fetches fail (or succeed again with `None`).
    pub async fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.write().await = failure;
    }

    /// Number of fetches so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for MockFeed {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failure.read().await.as_ref() {
            return Err(failure.to_error());
        }

        Ok(self.records.read().await.clone())
    }
}
