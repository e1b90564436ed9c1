use std::path::Path;

use sheetshelf_core::{CatalogStore, Config, PreviewMatcher, SanitizedConfig};
use tokio::sync::RwLock;

/// Shared application state
pub struct AppState {
    config: Config,
    /// Writers (selection changes, reloads, image failures) are serialized by
    /// this lock, so at most one load runs at a time.
    catalog: RwLock<CatalogStore>,
    matcher: PreviewMatcher,
}

impl AppState {
    pub fn new(config: Config, catalog: CatalogStore) -> Self {
        Self {
            matcher: PreviewMatcher::new().with_manual_mappings(config.previews.manual.clone()),
            config,
            catalog: RwLock::new(catalog),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &RwLock<CatalogStore> {
        &self.catalog
    }

    pub fn matcher(&self) -> &PreviewMatcher {
        &self.matcher
    }

    /// Directory scanned for preview suggestions, if configured.
    pub fn preview_scan_dir(&self) -> Option<&Path> {
        self.config.previews.scan_dir.as_deref()
    }

    pub fn static_dir(&self) -> Option<&Path> {
        self.config.server.static_dir.as_deref()
    }
}
