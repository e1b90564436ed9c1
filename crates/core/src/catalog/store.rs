//! The catalog store: loaded items plus the user's filter, search and sort.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::feed::FeedSource;
use crate::preview::{PreviewCandidate, PreviewChain, PreviewResolver};
use crate::text::normalize;

use super::filter::{normalize_category, visibility, ALL_CATEGORIES};
use super::normalize::ItemNormalizer;
use super::sort::sort_indices;
use super::types::{CatalogError, CatalogItem, SortKey};

/// Feed load state reported to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Loaded {
        items: usize,
        skipped: usize,
        loaded_at: DateTime<Utc>,
    },
    Failed {
        reason: String,
    },
}

/// Message shown instead of (or next to) an empty grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The feed could not be loaded.
    Unavailable { message: String, browse_url: String },
    /// The feed loaded but listed nothing usable.
    Empty { message: String },
    /// Items exist but none passes the current filters.
    NoResults { message: String },
}

/// One item in display order.
#[derive(Debug, Clone, Copy)]
pub struct VisibleEntry<'a> {
    /// Position in load order.
    pub index: usize,
    pub item: &'a CatalogItem,
    pub visible: bool,
}

/// Owned snapshot of everything the renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub status: LoadStatus,
    pub entries: Vec<CatalogViewEntry>,
    pub visible_count: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub category: String,
    pub search: String,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogViewEntry {
    pub index: usize,
    pub item: CatalogItem,
    pub visible: bool,
    pub preview: PreviewCandidate,
}

/// Owns the loaded catalog and the current filter, search and sort state.
///
/// Every setter recomputes visibility and order before returning, so reads
/// never observe a stale partition.
pub struct CatalogStore {
    feed: Arc<dyn FeedSource>,
    normalizer: ItemNormalizer,
    resolver: PreviewResolver,
    browse_url: String,
    items: Vec<CatalogItem>,
    previews: Vec<PreviewChain>,
    status: LoadStatus,
    active_category: String,
    search_term: String,
    sort_key: SortKey,
    visible: Vec<bool>,
    order: Vec<usize>,
}

impl CatalogStore {
    /// Create an empty store with default normalizer and preview rules.
    pub fn new(feed: Arc<dyn FeedSource>) -> Self {
        Self {
            feed,
            normalizer: ItemNormalizer::default(),
            resolver: PreviewResolver::default(),
            browse_url: crate::config::CatalogConfig::default().browse_url,
            items: Vec::new(),
            previews: Vec::new(),
            status: LoadStatus::Loading,
            active_category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
            sort_key: SortKey::Default,
            visible: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Create an empty store configured from `[catalog]` and `[previews]`.
    pub fn from_config(feed: Arc<dyn FeedSource>, config: &Config) -> Self {
        let mut store = Self::new(feed);
        store.normalizer = ItemNormalizer::new(&config.catalog.audio_marker);
        store.resolver = PreviewResolver::new(&config.previews);
        store.browse_url = config.catalog.browse_url.clone();
        store
    }

    /// Fetch and normalize the feed, replacing the current items.
    ///
    /// Never fails: transport and parse errors leave the store empty with a
    /// `Failed` status. Filter, search and sort selections survive a reload.
    pub async fn load(&mut self) -> &LoadStatus {
        self.status = LoadStatus::Loading;
        let started = Instant::now();

        match self.feed.fetch().await {
            Ok(records) => {
                let total = records.len();
                self.items = self.normalizer.normalize_all(records);
                self.status = LoadStatus::Loaded {
                    items: self.items.len(),
                    skipped: total - self.items.len(),
                    loaded_at: Utc::now(),
                };
                info!(
                    source = self.feed.name(),
                    items = self.items.len(),
                    skipped = total - self.items.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Catalog loaded"
                );
            }
            Err(e) => {
                error!(source = self.feed.name(), error = %e, "Error loading catalog");
                self.items.clear();
                self.status = LoadStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }

        self.previews = self.items.iter().map(|i| self.resolver.chain(i)).collect();
        self.recompute();
        &self.status
    }

    /// Select a category; "all" (or blank) shows every category.
    pub fn set_category(&mut self, category: &str) {
        self.active_category = normalize_category(category);
        self.recompute();
    }

    /// Set the free-text search term.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = normalize(term);
        self.recompute();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.recompute();
    }

    /// All items in display order, visible ones first.
    pub fn visible_ordered(&self) -> Vec<VisibleEntry<'_>> {
        self.order
            .iter()
            .map(|&index| VisibleEntry {
                index,
                item: &self.items[index],
                visible: self.visible[index],
            })
            .collect()
    }

    /// Only the visible items, in display order.
    pub fn visible_items(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.order
            .iter()
            .filter(|&&index| self.visible[index])
            .map(|&index| &self.items[index])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Items in load order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Message for the renderer when the grid would be empty.
    pub fn notice(&self) -> Option<Notice> {
        match &self.status {
            LoadStatus::Loading => None,
            LoadStatus::Failed { .. } => Some(Notice::Unavailable {
                message: "Catalog coming soon! Check back later or visit the store to browse available pieces."
                    .to_string(),
                browse_url: self.browse_url.clone(),
            }),
            LoadStatus::Loaded { .. } if self.items.is_empty() => Some(Notice::Empty {
                message: "No pieces are listed yet. Check back later.".to_string(),
            }),
            LoadStatus::Loaded { .. } if self.visible_count() == 0 => {
                let message = if self.search_term.is_empty() {
                    "No pieces found in this category.".to_string()
                } else {
                    format!(
                        "No pieces found matching \"{}\". Try a different search term.",
                        self.search_term
                    )
                };
                Some(Notice::NoResults { message })
            }
            LoadStatus::Loaded { .. } => None,
        }
    }

    /// Snapshot of the current state for serialization.
    pub fn view(&self) -> CatalogView {
        CatalogView {
            status: self.status.clone(),
            entries: self
                .visible_ordered()
                .into_iter()
                .map(|e| CatalogViewEntry {
                    index: e.index,
                    item: e.item.clone(),
                    visible: e.visible,
                    preview: self.previews[e.index].current().clone(),
                })
                .collect(),
            visible_count: self.visible_count(),
            total: self.items.len(),
            notice: self.notice(),
            category: self.active_category.clone(),
            search: self.search_term.clone(),
            sort: self.sort_key,
        }
    }

    /// Current preview candidate of the item at `index` (load order).
    pub fn preview(&self, index: usize) -> Result<&PreviewCandidate, CatalogError> {
        self.previews
            .get(index)
            .map(PreviewChain::current)
            .ok_or_else(|| CatalogError::NotFound(format!("item {}", index)))
    }

    /// Report that `failed_src` of item `index` failed to load.
    ///
    /// Returns the candidate to show next, or `None` when the item already
    /// shows its placeholder and the failure is ignored. Reports for a src
    /// the item no longer shows leave it where it is.
    pub fn report_image_failure(
        &mut self,
        index: usize,
        failed_src: &str,
    ) -> Result<Option<&PreviewCandidate>, CatalogError> {
        let chain = self
            .previews
            .get_mut(index)
            .ok_or_else(|| CatalogError::NotFound(format!("item {}", index)))?;
        Ok(chain.on_failure(failed_src, &self.resolver))
    }

    fn recompute(&mut self) {
        self.visible = visibility(&self.items, &self.active_category, &self.search_term);
        self.order = sort_indices(&self.items, &self.visible, self.sort_key);
    }
}
