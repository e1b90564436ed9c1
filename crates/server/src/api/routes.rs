use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{catalog, handlers, previews};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir().map(|dir| dir.to_path_buf());

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog view and user intents
        .route("/catalog", get(catalog::get_catalog))
        .route("/catalog/category", put(catalog::set_category))
        .route("/catalog/search", put(catalog::set_search))
        .route("/catalog/sort", put(catalog::set_sort))
        .route("/catalog/reload", post(catalog::reload))
        // Preview images
        .route("/previews/suggestions", get(previews::suggestions))
        .route("/previews/{index}", get(previews::get_preview))
        .route("/previews/{index}/failure", post(previews::report_failure))
        .with_state(state);

    let router = Router::new().nest("/api/v1", api_routes);

    // Serve the page's static assets when configured
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
