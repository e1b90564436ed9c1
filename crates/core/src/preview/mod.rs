//! Preview images: the per-item fallback chain and the offline filename
//! matcher.

mod chain;
mod matcher;

use std::path::Path;

use tracing::debug;

pub use chain::{
    NextCandidate, PreviewCandidate, PreviewChain, PreviewResolver, PreviewStage,
    CAPTION_NOT_FOUND, CAPTION_PREVIEW, CAPTION_UNAVAILABLE,
};
pub use matcher::{MatchMethod, MatchScore, PreviewMatch, PreviewMatcher, PreviewMatcherConfig};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// List image filenames directly inside `dir`, sorted by name.
pub async fn scan_preview_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if let (true, Some(name)) = (is_image, path.file_name().and_then(|n| n.to_str())) {
            files.push(name.to_string());
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Scanned preview directory");
    Ok(files)
}
