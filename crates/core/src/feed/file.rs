//! Feed read from a local JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{parse_records, FeedError, FeedSource};

pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
        debug!(path = %self.path.display(), "Reading catalog feed");
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_records(&body)
    }
}
