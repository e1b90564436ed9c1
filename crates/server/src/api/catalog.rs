//! Catalog API handlers.
//!
//! Every intent returns the full view so the page can re-render from a
//! single response.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sheetshelf_core::{CatalogError, CatalogView, SortKey};
use tracing::{debug, info};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalog
///
/// Current view: items in display order, visibility, previews and notice.
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogView> {
    Json(state.catalog().read().await.view())
}

/// PUT /api/v1/catalog/category
pub async fn set_category(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CategoryRequest>,
) -> Json<CatalogView> {
    let mut store = state.catalog().write().await;
    store.set_category(&request.category);
    debug!(category = store.active_category(), "Category changed");
    Json(store.view())
}

/// PUT /api/v1/catalog/search
pub async fn set_search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Json<CatalogView> {
    let mut store = state.catalog().write().await;
    store.set_search_term(&request.term);
    Json(store.view())
}

/// PUT /api/v1/catalog/sort
///
/// Unknown sort keys are rejected and leave the current order untouched.
pub async fn set_sort(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SortRequest>,
) -> Result<Json<CatalogView>, ApiError> {
    let key: SortKey = request
        .sort
        .parse()
        .map_err(|e: CatalogError| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut store = state.catalog().write().await;
    store.set_sort_key(key);
    Ok(Json(store.view()))
}

/// POST /api/v1/catalog/reload
///
/// Re-fetch the feed. A failed fetch is reported in the view, not as an
/// HTTP error.
pub async fn reload(State(state): State<Arc<AppState>>) -> Json<CatalogView> {
    let mut store = state.catalog().write().await;
    let status = store.load().await;
    info!(status = ?status, "Catalog reloaded");
    Json(store.view())
}
