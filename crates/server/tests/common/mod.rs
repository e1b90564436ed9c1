//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock feed injected, so the whole HTTP surface can be exercised
//! without a real catalog host.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use sheetshelf_core::{testing::MockFeed, CatalogStore, Config};
use sheetshelf_server::state::AppState;

/// Re-export fixtures for test convenience
pub use sheetshelf_core::testing::{fixtures, MockFailure};

/// Test fixture for E2E testing with a mock feed.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_catalog() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.get("/api/v1/catalog").await;
///     assert_eq!(response.body["total"], 5);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock feed - change records or inject failures, then reload
    pub feed: Arc<MockFeed>,
    /// Directory scanned for preview suggestions
    pub previews_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture loaded with the sample feed.
    pub async fn new() -> Self {
        Self::with_feed(MockFeed::with_records(fixtures::sample_feed())).await
    }

    /// Fixture whose initial load uses `feed`.
    pub async fn with_feed(feed: MockFeed) -> Self {
        let previews_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::default();
        config.previews.scan_dir = Some(previews_dir.path().to_path_buf());
        Self::build(feed, config, previews_dir).await
    }

    /// Fixture with a custom config; `previews.scan_dir` is left as given.
    pub async fn with_config(config: Config) -> Self {
        let previews_dir = TempDir::new().expect("Failed to create temp dir");
        Self::build(
            MockFeed::with_records(fixtures::sample_feed()),
            config,
            previews_dir,
        )
        .await
    }

    async fn build(feed: MockFeed, config: Config, previews_dir: TempDir) -> Self {
        let feed = Arc::new(feed);
        let mut store = CatalogStore::from_config(feed.clone(), &config);
        store.load().await;

        let state = Arc::new(AppState::new(config, store));
        let router = sheetshelf_server::api::create_router(state);

        Self {
            router,
            feed,
            previews_dir,
        }
    }

    /// Create an empty file in the preview scan directory.
    pub fn add_preview_file(&self, name: &str) {
        std::fs::write(self.previews_dir.path().join(name), b"")
            .expect("Failed to write preview file");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a PUT request with raw string body (for testing malformed JSON).
    pub async fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Titles of the visible entries of a catalog view, in display order.
pub fn visible_titles(view: &Value) -> Vec<String> {
    view["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e["visible"] == true)
                .filter_map(|e| e["item"]["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
