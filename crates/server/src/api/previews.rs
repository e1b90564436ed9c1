//! Preview image handlers: the image-error hook and matcher suggestions.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sheetshelf_core::{scan_preview_files, CatalogError, PreviewCandidate, PreviewMatch};
use tracing::warn;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request / response types
// ============================================================================

/// Body of an image failure report: the src the page tried to load.
#[derive(Debug, Deserialize)]
pub struct FailureRequest {
    pub src: String,
}

/// Outcome of an image failure report.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FailureResponse {
    Next {
        candidate: String,
        caption: String,
        terminal: bool,
    },
    Disarmed {
        disarmed: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<PreviewMatch>,
    pub files_scanned: usize,
}

fn not_found(e: CatalogError) -> ApiError {
    api_error(StatusCode::NOT_FOUND, e.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/previews/{index}
pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<PreviewCandidate>, ApiError> {
    let store = state.catalog().read().await;
    store.preview(index).cloned().map(Json).map_err(not_found)
}

/// POST /api/v1/previews/{index}/failure
///
/// Called by the page when an item's image fails to load. A report for a src
/// the item no longer shows answers with the current candidate.
pub async fn report_failure(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(request): Json<FailureRequest>,
) -> Result<Json<FailureResponse>, ApiError> {
    let mut store = state.catalog().write().await;
    let next = store
        .report_image_failure(index, &request.src)
        .map_err(not_found)?;

    let response = match next {
        Some(candidate) => FailureResponse::Next {
            candidate: candidate.src.clone(),
            caption: candidate.caption.to_string(),
            terminal: candidate.is_terminal(),
        },
        None => FailureResponse::Disarmed { disarmed: true },
    };
    Ok(Json(response))
}

/// GET /api/v1/previews/suggestions
///
/// Propose preview files for items that have none.
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let dir = state
        .preview_scan_dir()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "previews.scan_dir is not configured"))?;

    let files = scan_preview_files(dir).await.map_err(|e| {
        warn!(dir = %dir.display(), error = %e, "Failed to scan preview directory");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to scan {}: {}", dir.display(), e),
        )
    })?;

    let store = state.catalog().read().await;
    let suggestions = state.matcher().suggest(store.items(), &files);

    Ok(Json(SuggestionsResponse {
        suggestions,
        files_scanned: files.len(),
    }))
}
